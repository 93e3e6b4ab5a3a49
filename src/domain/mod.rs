//! Load tracking domain: the wire model, its normalization, the status
//! lifecycle and the screen workflows built on top of them.

pub mod app_state;
pub mod documents;
pub mod listing;
pub mod load;
pub mod normalize;
pub mod session;
pub mod status;
pub mod workflow;

pub use app_state::AppState;
pub use documents::{DocumentCategory, DocumentFile, DocumentOpState, UploadFile};
pub use listing::{ListActivity, LoadListKind, LoadListState, PageRequest};
pub use load::{Load, LoadPage, StatusAck};
pub use normalize::{AddressBlock, NormalizedLoadView};
pub use session::{
    Credentials, NewAccount, PasswordReset, Session, UserProfile, ValidationErrors,
};
pub use status::{LoadStatus, StatusColor};
pub use workflow::{LoadDetailsWorkflow, Notice, NoticeKind};
