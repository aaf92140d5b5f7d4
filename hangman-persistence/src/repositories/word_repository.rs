use anyhow::Result;
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

use crate::entities::{prelude::*, words};
use hangman_core::{WordCatalog, WordList};
use hangman_types::{GameError, Word, WordId};

pub struct WordRepository {
    db: DatabaseConnection,
}

impl WordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_word(model: words::Model) -> Word {
        Word {
            id: model.id,
            text: model.text,
            used: model.used,
        }
    }

    /// All words in the order they were added
    pub async fn find_all(&self) -> Result<Vec<Word>> {
        let words = Words::find()
            .order_by_asc(words::Column::CreatedAt)
            .order_by_asc(words::Column::Text)
            .all(&self.db)
            .await?;

        Ok(words.into_iter().map(Self::model_to_word).collect())
    }

    pub async fn find_word(&self, id: WordId) -> Result<Option<Word>> {
        let word_model = Words::find_by_id(id).one(&self.db).await?;
        Ok(word_model.map(Self::model_to_word))
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Words::find().count(&self.db).await?)
    }

    pub async fn count_unused(&self) -> Result<u64> {
        Ok(Words::find()
            .filter(words::Column::Used.eq(false))
            .count(&self.db)
            .await?)
    }

    pub async fn create_word(&self, text: &str) -> Result<Word> {
        let text = WordList::normalize(text).ok_or_else(|| GameError::InvalidWord {
            word: text.to_string(),
        })?;

        let word_model = words::ActiveModel {
            id: sea_orm::ActiveValue::Set(Uuid::new_v4()),
            text: sea_orm::ActiveValue::Set(text),
            used: sea_orm::ActiveValue::Set(false),
            created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        };

        let created = word_model.insert(&self.db).await?;
        Ok(Self::model_to_word(created))
    }

    /// Add every word of the list that is not in the catalog yet.
    /// Returns how many words were inserted.
    pub async fn seed(&self, word_list: &WordList) -> Result<usize> {
        let existing: HashSet<String> = Words::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|w| w.text)
            .collect();

        let mut inserted = 0;
        for text in word_list.words() {
            if existing.contains(text) {
                continue;
            }
            self.create_word(text).await?;
            inserted += 1;
        }

        info!("Seeded {} new words into the catalog", inserted);
        Ok(inserted)
    }
}

#[async_trait]
impl WordCatalog for WordRepository {
    async fn find_random_unused(&self) -> Result<Option<Word>> {
        let word_model = Words::find()
            .filter(words::Column::Used.eq(false))
            .order_by(Expr::cust("RANDOM()"), Order::Asc)
            .one(&self.db)
            .await?;

        Ok(word_model.map(Self::model_to_word))
    }

    async fn mark_used(&self, word_id: WordId) -> Result<()> {
        debug!("Marking word {} as used", word_id);
        Words::update_many()
            .col_expr(words::Column::Used, Expr::value(true))
            .filter(words::Column::Id.eq(word_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
