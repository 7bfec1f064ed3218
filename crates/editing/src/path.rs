// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of Quire.
//
// Quire is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// Quire is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with Quire. If not, see <https://www.gnu.org/licenses/>.

//! Document path sanity check.
//!
//! Rejected:
//! - the empty path
//! - any hidden segment (`.vuepress/config.md`, `guide/.draft`)
//! - three-digit root pages such as `404.md`
//! - `README.md` in any directory
//!
//! Matching is case-insensitive.

use crate::{EditError, EditResult};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RESERVED_PATH: Regex =
        Regex::new(r"(?i)((^|/)\.[^/]+(/|$)|^\d{3}\.md$|(^|/)README\.md$)")
            .expect("reserved path pattern is valid");
}

/// Check that `path` names an editable document.
pub fn validate_document_path(path: &str) -> EditResult<()> {
    if path.is_empty() || RESERVED_PATH.is_match(path) {
        return Err(EditError::BadPath(path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(path: &str) -> bool {
        matches!(validate_document_path(path), Err(EditError::BadPath(_)))
    }

    #[test]
    fn test_accepts_regular_documents() {
        for path in [
            "index.md",
            "guide/getting-started.md",
            "fr/guide/installation.md",
            "1234.md",
            "guide/404.md",
            "my.file.md",
            "guide/README-old.md",
        ] {
            assert!(validate_document_path(path).is_ok(), "{path} should be accepted");
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert!(rejected(""));
    }

    #[test]
    fn test_rejects_hidden_segments() {
        assert!(rejected(".vuepress/config.md"));
        assert!(rejected("guide/.draft.md"));
        assert!(rejected("guide/.hidden/page.md"));
        assert!(rejected("../secrets.md"));
    }

    #[test]
    fn test_rejects_error_pages() {
        assert!(rejected("404.md"));
        assert!(rejected("500.MD"));
    }

    #[test]
    fn test_rejects_readme_anywhere() {
        assert!(rejected("README.md"));
        assert!(rejected("readme.md"));
        assert!(rejected("guide/ReadMe.MD"));
    }
}
