pub const DEFAULT_NAME_FORMAT: &str = "{label} {tag}";

const LABEL_PLACEHOLDER: &str = "{label}";
const LEGACY_LABEL_PLACEHOLDER: &str = "{displayname}";
const TAG_PLACEHOLDER: &str = "{tag}";

/// Template used to build a display label from a base label and tag text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFormat(String);

impl NameFormat {
    /// A missing or blank template falls back to [`DEFAULT_NAME_FORMAT`].
    pub fn new(template: Option<&str>) -> Self {
        match template {
            Some(t) if !t.trim().is_empty() => Self(t.to_string()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes every placeholder in one pass over the template, so braces
    /// inside `label` or `tag` are copied verbatim.
    pub fn render(&self, label: &str, tag: &str) -> String {
        let placeholders = [
            (LABEL_PLACEHOLDER, label),
            (LEGACY_LABEL_PLACEHOLDER, label),
            (TAG_PLACEHOLDER, tag),
        ];

        let mut rendered = String::with_capacity(self.0.len() + label.len() + tag.len());
        let mut rest = self.0.as_str();
        while let Some(start) = rest.find('{') {
            rendered.push_str(&rest[..start]);
            rest = &rest[start..];
            match placeholders
                .iter()
                .find(|(placeholder, _)| rest.starts_with(placeholder))
            {
                Some((placeholder, value)) => {
                    rendered.push_str(value);
                    rest = &rest[placeholder.len()..];
                }
                None => {
                    rendered.push('{');
                    rest = &rest[1..];
                }
            }
        }
        rendered.push_str(rest);
        rendered
    }
}

impl Default for NameFormat {
    fn default() -> Self {
        Self(DEFAULT_NAME_FORMAT.to_string())
    }
}

/// Display label the caller must apply once a transaction has committed.
///
/// The engine never owns the session label; it only hands back the value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the new display label has to be applied by the caller"]
pub struct LabelUpdate(String);

impl LabelUpdate {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Writes the label into the caller's slot.
    pub fn apply(self, slot: &mut String) {
        *slot = self.0;
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
