use crate::error::BuildError;
use crate::postings::{PostingsBuilder, SearchableString};
use crate::repo::{RepositoryDescriptor, SubRepoIndex};
use crate::DocID;

// start < end. Used for symbol ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSection {
    pub start: u32,
    pub end: u32,
}

impl DocumentSection {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub name: Vec<u8>,
    pub content: Vec<u8>,
    pub branches: Vec<String>,
    pub sub_repository_path: String,
    pub symbols: Vec<DocumentSection>,
}

impl Document {
    pub fn new(name: impl Into<Vec<u8>>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }
}

// Single-threaded by construction: no internal locking, caller must not
// touch one instance from two threads at once.
pub struct IndexBuilder {
    contents: PostingsBuilder,
    names: PostingsBuilder,

    files: Vec<SearchableString>,
    file_names: Vec<SearchableString>,
    doc_sections: Vec<Vec<DocumentSection>>,
    branch_masks: Vec<u32>,
    sub_repos: Vec<u32>,

    repo: RepositoryDescriptor,
    sub_repo_index: SubRepoIndex,
}

impl IndexBuilder {
    // `descriptor: None` is treated as an empty repository descriptor.
    pub fn new(descriptor: Option<RepositoryDescriptor>) -> Result<Self, BuildError> {
        let repo = descriptor.unwrap_or_default().validate_and_root()?;
        let sub_repo_index = SubRepoIndex::build(&repo);

        Ok(Self {
            contents: PostingsBuilder::new(),
            names: PostingsBuilder::new(),
            files: Vec::new(),
            file_names: Vec::new(),
            doc_sections: Vec::new(),
            branch_masks: Vec::new(),
            sub_repos: Vec::new(),
            repo,
            sub_repo_index,
        })
    }

    // Only legal before any document has been added.
    pub fn set_repository(&mut self, descriptor: RepositoryDescriptor) -> Result<(), BuildError> {
        if !self.files.is_empty() {
            return Err(BuildError::Ordering);
        }
        let repo = descriptor.validate_and_root()?;
        self.sub_repo_index = SubRepoIndex::build(&repo);
        self.repo = repo;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    // Includes name bytes alongside content bytes so repos of many tiny or
    // empty files still register as non-trivial for the caller's size checks.
    pub fn content_size(&self) -> u32 {
        self.contents.end_byte() + self.names.end_byte()
    }

    pub fn repository(&self) -> &RepositoryDescriptor {
        &self.repo
    }

    pub fn sub_repo_index(&self) -> &SubRepoIndex {
        &self.sub_repo_index
    }

    pub fn contents(&self) -> &PostingsBuilder {
        &self.contents
    }

    pub fn names(&self) -> &PostingsBuilder {
        &self.names
    }

    pub fn files(&self) -> &[SearchableString] {
        &self.files
    }

    pub fn file_names(&self) -> &[SearchableString] {
        &self.file_names
    }

    pub fn doc_sections(&self) -> &[Vec<DocumentSection>] {
        &self.doc_sections
    }

    pub fn branch_masks(&self) -> &[u32] {
        &self.branch_masks
    }

    pub fn sub_repos(&self) -> &[u32] {
        &self.sub_repos
    }

    pub fn add_file(
        &mut self,
        name: impl Into<Vec<u8>>,
        content: impl Into<Vec<u8>>,
    ) -> Result<DocID, BuildError> {
        self.add(Document::new(name, content))
    }

    // Validation runs in full before any mutation of the postings builders:
    // a rejected document leaves the assembler exactly as it was before.
    pub fn add(&mut self, mut document: Document) -> Result<DocID, BuildError> {
        document.symbols.sort_by_key(|s| s.start);
        for pair in document.symbols.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if prev.end > next.start {
                return Err(BuildError::SectionOverlap {
                    prev_end: prev.end,
                    next_start: next.start,
                });
            }
        }

        let sub_repo_path = document.sub_repository_path.as_str();
        if !sub_repo_path.is_empty() && relative_path(&document.name, sub_repo_path).is_none() {
            // The relative path of `name` against `sub_repo_path` is just
            // `name` unchanged whenever there's no common prefix to strip —
            // i.e. `name` does not lie under the declared sub-repo.
            return Err(BuildError::SubRepoPathMismatch {
                name: String::from_utf8_lossy(&document.name).into_owned(),
                sub_repo_path: sub_repo_path.to_string(),
            });
        }

        let sub_repo_id = self
            .sub_repo_index
            .resolve(sub_repo_path)
            .ok_or_else(|| BuildError::UnknownSubRepo(sub_repo_path.to_string()))?;

        let mut mask: u32 = 0;
        for branch in &document.branches {
            let pos = self
                .repo
                .branch_position(branch)
                .ok_or_else(|| BuildError::UnknownBranch(branch.clone()))?;
            mask |= 1 << pos;
        }

        let content_handle = self.contents.ingest(&document.content);
        let name_handle = self.names.ingest(&document.name);

        self.sub_repos.push(sub_repo_id);
        self.files.push(content_handle);
        self.file_names.push(name_handle);
        self.doc_sections.push(document.symbols);
        self.branch_masks.push(mask);

        Ok((self.files.len() - 1) as DocID)
    }
}

// name with sub_repo_path prefix + separator stripped, or None if name
// doesn't lie under it. Byte-oriented so names need not be valid UTF-8 paths.
fn relative_path(name: &[u8], sub_repo_path: &str) -> Option<Vec<u8>> {
    let prefix = sub_repo_path.as_bytes();
    if !name.starts_with(prefix) {
        return None;
    }
    match name.get(prefix.len()) {
        Some(b'/') => Some(name[prefix.len() + 1..].to_vec()),
        _ => None,
    }
}
