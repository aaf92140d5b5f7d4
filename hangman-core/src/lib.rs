pub mod collaborators;
pub mod hidden_word;
pub mod letter_set;
pub mod memory;
pub mod scoreboard;
pub mod scoring;
pub mod session;
pub mod word_list;

// Re-export main components
pub use collaborators::*;
pub use letter_set::LetterSet;
pub use memory::InMemoryStore;
pub use scoreboard::build_scoreboard;
pub use scoring::*;
pub use session::*;
pub use word_list::WordList;
