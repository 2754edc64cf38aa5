pub mod body;
pub mod error;

pub use body::optional_json_body;
pub use error::{
    bad_request, extractor_error, handle_domain_error, handle_validation_errors, status_for,
};
