pub(crate) mod generated_papers;
