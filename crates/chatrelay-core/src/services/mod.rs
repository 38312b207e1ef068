pub mod directory;
pub mod relay;

pub use directory::UserDirectory;
pub use relay::{AgentRelay, AgentReply};
