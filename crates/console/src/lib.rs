//! Interactive side of the report manager: the hub/display session, the
//! shop context it reads and the presenter it paints through.

pub mod context;
pub mod presenter;
pub mod session;

pub use context::ShopContext;
pub use presenter::{Presenter, PresenterEvent, RecordingPresenter, TextPresenter};
pub use session::{ReportSession, SessionError, View};
