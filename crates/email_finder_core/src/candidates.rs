//! Email candidate generation
//!
//! Builds the ordered list of speculative addresses for a person at a domain.
//! Usernames come from a fixed table of templates, most common corporate
//! patterns first, so the cascade tries `first.last` long before anything
//! exotic. Middle-name templates are only used when the name has a middle part.

use crate::names::NameParts;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// A username template: a display pattern and the function that renders it
#[derive(Clone, Copy)]
pub struct UsernameTemplate {
    pub pattern: &'static str,
    render: fn(&NameParts) -> String,
}

impl UsernameTemplate {
    pub fn render(&self, name: &NameParts) -> String {
        (self.render)(name)
    }
}

impl std::fmt::Debug for UsernameTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.pattern)
    }
}

/// First character of a name part, empty when the part is empty
fn initial(part: &str) -> &str {
    match part.chars().next() {
        Some(c) => &part[..c.len_utf8()],
        None => "",
    }
}

macro_rules! template {
    ($pattern:literal, |$n:ident| $body:expr) => {
        UsernameTemplate {
            pattern: $pattern,
            render: |$n: &NameParts| $body,
        }
    };
}

/// Templates tried for every name, in priority order
pub static BASE_TEMPLATES: [UsernameTemplate; 25] = [
    template!("{fn}.{ln}", |n| format!("{}.{}", n.first, n.last)),
    template!("{fn}{ln}", |n| format!("{}{}", n.first, n.last)),
    template!("{fn[0]}{ln}", |n| format!("{}{}", initial(&n.first), n.last)),
    template!("{fn}", |n| n.first.clone()),
    template!("{ln}", |n| n.last.clone()),
    template!("{fn}_{ln}", |n| format!("{}_{}", n.first, n.last)),
    template!("{fn[0]}.{ln}", |n| format!("{}.{}", initial(&n.first), n.last)),
    template!("{ln}.{fn}", |n| format!("{}.{}", n.last, n.first)),
    template!("{ln}{fn}", |n| format!("{}{}", n.last, n.first)),
    template!("{fn}{ln[0]}", |n| format!("{}{}", n.first, initial(&n.last))),
    template!("{fn}.{ln[0]}", |n| format!("{}.{}", n.first, initial(&n.last))),
    template!("{ln}{fn[0]}", |n| format!("{}{}", n.last, initial(&n.first))),
    template!("{ln}.{fn[0]}", |n| format!("{}.{}", n.last, initial(&n.first))),
    template!("{fn}-{ln}", |n| format!("{}-{}", n.first, n.last)),
    template!("{ln}_{fn}", |n| format!("{}_{}", n.last, n.first)),
    template!("{ln}-{fn}", |n| format!("{}-{}", n.last, n.first)),
    template!("{fn[0]}_{ln}", |n| format!("{}_{}", initial(&n.first), n.last)),
    template!("{fn[0]}-{ln}", |n| format!("{}-{}", initial(&n.first), n.last)),
    template!("{fn}_{ln[0]}", |n| format!("{}_{}", n.first, initial(&n.last))),
    template!("{fn}-{ln[0]}", |n| format!("{}-{}", n.first, initial(&n.last))),
    template!("{ln[0]}{fn}", |n| format!("{}{}", initial(&n.last), n.first)),
    template!("{ln[0]}.{fn}", |n| format!("{}.{}", initial(&n.last), n.first)),
    template!("{ln}_{fn[0]}", |n| format!("{}_{}", n.last, initial(&n.first))),
    template!("{fn[0]}{ln[0]}", |n| format!("{}{}", initial(&n.first), initial(&n.last))),
    template!("{fn[0]}.{ln[0]}", |n| format!("{}.{}", initial(&n.first), initial(&n.last))),
];

/// Templates appended only when a middle name is present
pub static MIDDLE_TEMPLATES: [UsernameTemplate; 14] = [
    template!("{fn}.{mn}.{ln}", |n| format!("{}.{}.{}", n.first, n.middle, n.last)),
    template!("{fn}{mn}{ln}", |n| format!("{}{}{}", n.first, n.middle, n.last)),
    template!("{fn}.{mn[0]}.{ln}", |n| format!("{}.{}.{}", n.first, initial(&n.middle), n.last)),
    template!("{fn}{mn[0]}{ln}", |n| format!("{}{}{}", n.first, initial(&n.middle), n.last)),
    template!("{fn[0]}{mn[0]}{ln}", |n| {
        format!("{}{}{}", initial(&n.first), initial(&n.middle), n.last)
    }),
    template!("{fn[0]}.{mn[0]}.{ln}", |n| {
        format!("{}.{}.{}", initial(&n.first), initial(&n.middle), n.last)
    }),
    template!("{fn}_{mn}_{ln}", |n| format!("{}_{}_{}", n.first, n.middle, n.last)),
    template!("{fn}-{mn}-{ln}", |n| format!("{}-{}-{}", n.first, n.middle, n.last)),
    template!("{fn[0]}{mn}{ln}", |n| format!("{}{}{}", initial(&n.first), n.middle, n.last)),
    template!("{fn}.{mn}", |n| format!("{}.{}", n.first, n.middle)),
    template!("{mn}.{ln}", |n| format!("{}.{}", n.middle, n.last)),
    template!("{fn}{mn[0]}", |n| format!("{}{}", n.first, initial(&n.middle))),
    template!("{mn}", |n| n.middle.clone()),
    template!("{fn[0]}{mn[0]}{ln[0]}", |n| {
        format!("{}{}{}", initial(&n.first), initial(&n.middle), initial(&n.last))
    }),
];

/// Ordered, duplicate-free set of syntactically valid email candidates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    emails: Vec<String>,
    seen: HashSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an email if it is valid and not yet present
    ///
    /// Returns `true` when the email was added.
    pub fn insert(&mut self, email: String) -> bool {
        if !is_acceptable_candidate(&email) || self.seen.contains(&email) {
            return false;
        }
        self.seen.insert(email.clone());
        self.emails.push(email);
        true
    }

    pub fn contains(&self, email: &str) -> bool {
        self.seen.contains(email)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.emails.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.emails
    }
}

impl IntoIterator for CandidateSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.emails.into_iter()
    }
}

impl FromIterator<String> for CandidateSet {
    /// Collects emails through [`CandidateSet::insert`], so invalid ones are dropped
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        for email in iter {
            set.insert(email);
        }
        set
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.emails.iter()
    }
}

/// Email syntax check plus the empty-fragment guard
pub fn is_acceptable_candidate(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email) && !email.contains("@.")
}

/// The templates that apply to a parsed name, in generation order
pub fn templates_for(name: &NameParts) -> impl Iterator<Item = &'static UsernameTemplate> {
    let middle: &'static [UsernameTemplate] = if name.has_middle() {
        &MIDDLE_TEMPLATES
    } else {
        &[]
    };
    BASE_TEMPLATES.iter().chain(middle.iter())
}

/// Generate the ordered candidate set for a name at a domain
pub fn generate_candidates(name: &NameParts, domain: &str) -> CandidateSet {
    let mut candidates = CandidateSet::new();

    for template in templates_for(name) {
        let email = format!("{}@{}", template.render(name), domain);
        if !candidates.insert(email) {
            debug!("Template {} produced no new candidate", template.pattern);
        }
    }

    debug!(
        "Generated {} candidates for domain {} (middle name: {})",
        candidates.len(),
        domain,
        name.has_middle()
    );

    candidates
}
