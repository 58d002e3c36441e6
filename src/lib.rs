pub mod align;
pub mod error;
pub mod flatten;
pub mod normalize;
pub mod project;
pub mod read;

pub use align::match_indices;
pub use error::Error;
pub use flatten::Cell;
pub use project::{project, QueryInput, QueryRecord};
pub use read::{ColumnTable, RowTable};
