use crate::domain::entities::{NewTag, Tag};

#[derive(Debug, Clone, Copy, Default)]
pub struct TagService;

impl TagService {
    pub fn create_tag_entity(&self, name: &str) -> NewTag {
        NewTag {
            name: name.trim().to_string(),
        }
    }

    /// Renames keep the usage counter.
    pub fn update_tag(&self, existing: &Tag, name: Option<String>) -> Tag {
        Tag {
            id: existing.id,
            name: name
                .map(|n| n.trim().to_string())
                .unwrap_or_else(|| existing.name.clone()),
            usages: existing.usages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_keeps_usages() {
        let tag = Tag {
            id: 1,
            name: "cardio".into(),
            usages: 3,
        };
        let renamed = TagService.update_tag(&tag, Some(" hiit ".into()));

        assert_eq!(renamed.name, "hiit");
        assert_eq!(renamed.usages, 3);
        assert_eq!(TagService.update_tag(&tag, None), tag);
    }
}
