use std::sync::LazyLock;

use regex::Regex;

use super::repo::RemoteInfo;
use crate::error::{RepodeckError, Result};

/// `github.com/<owner>/<repo>`; the repo segment stops at the first `.`.
static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([^/]+)/([^/.]+)").expect("static regex is valid")
});

/// Parse owner and repository name out of a GitHub URL.
///
/// Only `github.com/<owner>/<repo>` forms match; SSH `git@github.com:owner/repo`
/// remotes and other hosts are rejected.
pub fn parse_github_url(url: &str) -> Result<RemoteInfo> {
    let caps = GITHUB_URL
        .captures(url)
        .ok_or_else(|| RepodeckError::InvalidRepositoryUrl(url.to_string()))?;

    Ok(RemoteInfo {
        owner: caps[1].to_string(),
        repo_name: caps[2].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_https_with_git_suffix() {
        let info = parse_github_url("https://github.com/acme/widget.git").unwrap();
        assert_eq!(info.owner, "acme");
        assert_eq!(info.repo_name, "widget");
    }

    #[test]
    fn parse_without_suffix_or_scheme() {
        let info = parse_github_url("github.com/octo-org/deckhand").unwrap();
        assert_eq!(info.owner, "octo-org");
        assert_eq!(info.repo_name, "deckhand");

        let info = parse_github_url("https://github.com/acme/widget/tree/main").unwrap();
        assert_eq!(info.repo_name, "widget");
    }

    #[test]
    fn dotted_repo_name_is_truncated() {
        let info = parse_github_url("https://github.com/acme/site.io").unwrap();
        assert_eq!(info.repo_name, "site");
    }

    #[test]
    fn other_hosts_fail() {
        let err = parse_github_url("https://gitlab.com/acme/widget").unwrap_err();
        assert!(matches!(err, RepodeckError::InvalidRepositoryUrl(_)));
    }

    #[test]
    fn ssh_and_short_forms_fail() {
        assert!(parse_github_url("git@github.com:acme/widget.git").is_err());
        assert!(parse_github_url("https://github.com/acme").is_err());
        assert!(parse_github_url("https://github.com/acme/").is_err());
        assert!(parse_github_url("").is_err());
    }
}
