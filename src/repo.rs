use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::MAX_BRANCHES;

// sub_repos is only populated on the root descriptor passed to
// IndexBuilder::new; not meant to be read back out of a nested descriptor
// once installed (see SubRepoIndex).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub name: String,
    #[serde(default)]
    pub url_template: String,
    #[serde(default)]
    pub commit_url_template: String,
    #[serde(default)]
    pub file_url_template: String,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub sub_repos: BTreeMap<String, RepositoryDescriptor>,
}

impl RepositoryDescriptor {
    // Installs a copy of self under the empty-string key in its own
    // sub_repos map (with that copy's sub_repos cleared) so the root
    // participates uniformly in sub-repo lookups without a cycle.
    pub fn validate_and_root(mut self) -> Result<Self, BuildError> {
        if self.branches.len() > MAX_BRANCHES {
            return Err(BuildError::TooManyBranches {
                count: self.branches.len(),
            });
        }

        for template in [
            &self.url_template,
            &self.commit_url_template,
            &self.file_url_template,
        ] {
            validate_template(template)?;
        }

        for sub in self.sub_repos.values() {
            validate_template(&sub.url_template)?;
            validate_template(&sub.commit_url_template)?;
            validate_template(&sub.file_url_template)?;
            if sub.branches.len() > MAX_BRANCHES {
                return Err(BuildError::TooManyBranches {
                    count: sub.branches.len(),
                });
            }
            // Computed for parity with the upstream project, which checks
            // branch-list equality between a sub-repo and the root but never
            // acts on the result. We preserve the computation as a no-op so
            // a future caller can decide what (if anything) to do with it.
            let _branches_match = sub.branches == self.branches;
        }

        let mut root_copy = self.clone();
        root_copy.sub_repos = BTreeMap::new();
        self.sub_repos.insert(String::new(), root_copy);

        Ok(self)
    }

    pub fn branch_position(&self, branch: &str) -> Option<usize> {
        self.branches.iter().position(|b| b == branch)
    }
}

// Braces balanced and not nested. Does not execute or interpret the template.
fn validate_template(template: &str) -> Result<(), BuildError> {
    let mut depth = 0i32;
    for c in template.chars() {
        match c {
            '{' => {
                depth += 1;
                if depth > 1 {
                    return Err(BuildError::TemplateSyntax {
                        template: template.to_string(),
                    });
                }
            }
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(BuildError::TemplateSyntax {
                        template: template.to_string(),
                    });
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(BuildError::TemplateSyntax {
            template: template.to_string(),
        });
    }
    Ok(())
}

// Dense indices 0..n assigned to sub-repository paths, sorted
// lexicographically. Computed once, never mutated afterward.
#[derive(Debug, Clone, Default)]
pub struct SubRepoIndex {
    paths: Vec<String>,
}

impl SubRepoIndex {
    pub fn build(desc: &RepositoryDescriptor) -> Self {
        let mut paths: Vec<String> = desc.sub_repos.keys().cloned().collect();
        paths.sort();
        Self { paths }
    }

    // Empty string denotes the root. None if never declared.
    pub fn resolve(&self, path: &str) -> Option<u32> {
        self.paths
            .binary_search_by(|p| p.as_str().cmp(path))
            .ok()
            .map(|i| i as u32)
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
