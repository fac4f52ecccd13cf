pub(crate) mod generated_papers;
pub(crate) mod questions;
pub(crate) mod subjects;
pub(crate) mod topics;
pub(crate) mod users;
