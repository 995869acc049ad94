use serde::{Deserialize, Serialize};
use std::fmt;

/// The part of an outreach message a template produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateRole {
    Subject,
    Body,
    Chaser,
}

impl TemplateRole {
    /// Roles in validation order
    pub const ALL: [TemplateRole; 3] = [TemplateRole::Subject, TemplateRole::Body, TemplateRole::Chaser];

    pub fn title(&self) -> &'static str {
        match self {
            TemplateRole::Subject => "Subject template",
            TemplateRole::Body => "Email copy template",
            TemplateRole::Chaser => "Chaser copy template",
        }
    }

    /// Optional roles may hold zero templates and then merge to empty text
    pub fn is_optional(&self) -> bool {
        matches!(self, TemplateRole::Chaser)
    }
}

impl fmt::Display for TemplateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateRole::Subject => write!(f, "subject"),
            TemplateRole::Body => write!(f, "body"),
            TemplateRole::Chaser => write!(f, "chaser"),
        }
    }
}

/// One captured template variant. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub role: TemplateRole,

    /// Position within the role's rotation list
    pub variant: usize,

    pub text: String,
}

impl Template {
    pub fn new(role: TemplateRole, variant: usize, text: impl Into<String>) -> Self {
        Self {
            role,
            variant,
            text: text.into(),
        }
    }

    /// Human label, e.g. "Subject template B"
    pub fn label(&self) -> String {
        format!("{} {}", self.role.title(), variant_letter(self.variant))
    }
}

/// A, B, ... Z, then AA, AB, ...
pub fn variant_letter(variant: usize) -> String {
    let mut n = variant;
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Ordered template lists for every role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSet {
    pub subject: Vec<Template>,
    pub body: Vec<Template>,
    pub chaser: Vec<Template>,
}

impl TemplateSet {
    /// Build from raw editor text. Entries are trimmed and blank ones dropped.
    pub fn from_texts(subject: &[String], body: &[String], chaser: &[String]) -> Self {
        Self {
            subject: capture(TemplateRole::Subject, subject),
            body: capture(TemplateRole::Body, body),
            chaser: capture(TemplateRole::Chaser, chaser),
        }
    }

    pub fn for_role(&self, role: TemplateRole) -> &[Template] {
        match role {
            TemplateRole::Subject => &self.subject,
            TemplateRole::Body => &self.body,
            TemplateRole::Chaser => &self.chaser,
        }
    }

    /// Templates of the given roles, role by role, in list order
    pub fn iter_roles<'a>(&'a self, roles: &'a [TemplateRole]) -> impl Iterator<Item = &'a Template> + 'a {
        roles.iter().flat_map(move |role| self.for_role(*role).iter())
    }
}

fn capture(role: TemplateRole, texts: &[String]) -> Vec<Template> {
    texts
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(variant, text)| Template::new(role, variant, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_texts_trims_and_drops_blank() {
        let set = TemplateSet::from_texts(
            &texts(&["  Hello {{name}}  ", "", "   "]),
            &texts(&["Body"]),
            &[],
        );
        assert_eq!(set.subject.len(), 1);
        assert_eq!(set.subject[0].text, "Hello {{name}}");
        assert_eq!(set.subject[0].variant, 0);
        assert!(set.chaser.is_empty());
    }

    #[test]
    fn test_variant_numbering_skips_dropped_entries() {
        let set = TemplateSet::from_texts(&[], &texts(&["A", " ", "B"]), &[]);
        assert_eq!(set.body[1].text, "B");
        assert_eq!(set.body[1].variant, 1);
        assert_eq!(set.body[1].label(), "Email copy template B");
    }

    #[test]
    fn test_variant_letter() {
        assert_eq!(variant_letter(0), "A");
        assert_eq!(variant_letter(25), "Z");
        assert_eq!(variant_letter(26), "AA");
        assert_eq!(variant_letter(27), "AB");
    }

    #[test]
    fn test_iter_roles_order() {
        let set = TemplateSet::from_texts(&texts(&["s"]), &texts(&["b1", "b2"]), &texts(&["c"]));
        let order: Vec<&str> = set
            .iter_roles(&TemplateRole::ALL)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(order, vec!["s", "b1", "b2", "c"]);
    }
}
