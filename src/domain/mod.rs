pub mod board;
pub mod card;
pub mod column;
pub mod drag;
pub mod id;
pub mod snapshot;
pub mod user;
pub mod view;

pub use board::Board;
pub use card::{Card, CardUpdate, NewCard, Priority};
pub use column::Column;
pub use drag::{CardMove, DragLocation, DropResult};
pub use id::{BoardId, CardId, ColumnId, UserId};
pub use snapshot::Snapshot;
pub use user::User;
pub use view::{format_date, BoardRow};
