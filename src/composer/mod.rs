// Composer — the message-collection model behind the chat modal
//
// Holds the ordered list of user-composed entries (text, image, audio),
// keeps an observer synchronized on every structural change, and hands the
// list off to the tool-calling protocol on "process".

pub mod entry;
pub mod list;
pub mod session;


pub use entry::ChatEntry;
pub use list::{ChatList, ChatObserver, DeleteConfirmer};
pub use session::{ComposerMode, ComposerSession};
