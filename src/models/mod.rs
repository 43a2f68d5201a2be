// Models module

pub mod level;
pub mod progress;
pub mod story;
pub mod user;
pub mod vocabulary;

// Re-export commonly used types
pub use level::{Level, LevelInfo};
pub use progress::{DashboardSummary, LearnerProgress, PracticeRequest, PracticeSession, ProgressColor};
pub use story::Story;
pub use user::{Credentials, LoginRequest, NewUser, Profile, PublicUser, RegisterRequest, User};
pub use vocabulary::{CreateListRequest, ListSummary, ListWord, VocabularyCard, VocabularyList};
