use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("url template {template:?} is not syntactically valid")]
    TemplateSyntax { template: String },

    #[error("repository declares {count} branches, but at most {max} are supported", max = crate::MAX_BRANCHES)]
    TooManyBranches { count: usize },

    #[error("cannot set the repository descriptor after documents have been added")]
    Ordering,

    #[error("document symbol sections overlap: {prev_end} > {next_start}")]
    SectionOverlap { prev_end: u32, next_start: u32 },

    #[error("document name {name:?} does not lie under sub-repository path {sub_repo_path:?}")]
    SubRepoPathMismatch { name: String, sub_repo_path: String },

    #[error("unknown sub-repository path {0:?}")]
    UnknownSubRepo(String),

    #[error("unknown branch {0:?}")]
    UnknownBranch(String),
}
