use std::collections::HashSet;

use crate::model::*;

pub fn parse_questionnaire(
    content: &str,
    source_file: &str,
    source_hash: &str,
) -> Result<Questionnaire, String> {
    let mut questionnaire: Questionnaire = serde_yaml::from_str(content)
        .map_err(|e| format!("Invalid questionnaire: {}", e))?;

    validate_definition(&questionnaire)?;

    questionnaire.source_file = source_file.to_string();
    questionnaire.source_hash = source_hash.to_string();
    Ok(questionnaire)
}

fn validate_definition(q: &Questionnaire) -> Result<(), String> {
    if q.items.is_empty() {
        return Err("Questionnaire has no items".to_string());
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (i, item) in q.items.iter().enumerate() {
        let link_id = item.link_id.as_str();
        if link_id.trim().is_empty() {
            return Err(format!("Item {} has an empty link_id", i + 1));
        }
        if link_id.trim() != link_id {
            return Err(format!(
                "Item {} has whitespace around its link_id '{}'",
                i + 1,
                link_id
            ));
        }
        if !seen.insert(link_id) {
            return Err(format!("Duplicate link_id '{}'", link_id));
        }

        match item.kind {
            ItemKind::Choice if item.options.is_empty() => {
                return Err(format!("Choice item '{}' has no options", link_id));
            }
            ItemKind::Integer => {
                if let (Some(min), Some(max)) = (item.min, item.max) {
                    if min > max {
                        return Err(format!(
                            "Item '{}' has min {} greater than max {}",
                            link_id, min, max
                        ));
                    }
                }
            }
            _ => {}
        }

        if item.kind == ItemKind::Display && item.required {
            return Err(format!("Display item '{}' cannot be required", link_id));
        }
    }

    Ok(())
}
