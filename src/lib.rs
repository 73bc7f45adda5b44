pub mod chase;
pub mod closure;
pub mod cover;
pub mod error;
pub mod normal_form;
pub mod parser;
pub mod problem;
pub mod schema;
pub mod unionfind;


pub use chase::is_lossless;
pub use closure::{candidate_key, closure};
pub use cover::{minimal_cover, non_redundant};
pub use error::FdError;
pub use normal_form::synthesize_3nf;
pub use parser::{parse_fd, parse_fd_set, parse_field_set};
pub use problem::Problem;
pub use schema::{Attribute, Fd, FdSet, FieldSet};
