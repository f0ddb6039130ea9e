//! Template injection - splices template bodies into pages

use log::debug;

use crate::config::InjectorConfig;
use crate::error::InjectError;
use crate::tag::extract_tags;
use crate::values::ValueMap;

use super::registry::TemplateRegistry;

pub const INJECT_TEMPLATE_TAG: &str = "INJECT_TEMPLATE";
pub const INJECT_TEMPLATE_ID_PROPERTY: &str = "templateId";

/// Replace every `INJECT_TEMPLATE` tag in `raw` with the referenced template
///
/// Passes repeat over the spliced text until no injection tag is left, so
/// templates may inject other templates. Every property other than
/// `templateId` is added to `values`; declaring the same key twice on one
/// page is an error. At most `config.max_depth` passes may inject anything.
pub fn inject_templates(
    raw: &str,
    templates: &TemplateRegistry,
    values: &mut ValueMap,
    config: &InjectorConfig,
) -> Result<String, InjectError> {
    let mut html = raw.to_string();
    let mut passes = 0;

    loop {
        let spliced = inject_pass(&html, templates, values).map_err(|e| {
            if passes == 0 {
                e
            } else {
                e.expanded(passes)
            }
        })?;

        let Some(spliced) = spliced else {
            return Ok(html);
        };

        passes += 1;
        if passes > config.max_depth {
            return Err(InjectError::RecursionLimit {
                limit: config.max_depth,
            });
        }
        html = spliced;
    }
}

/// One splice over `html`; `None` when it holds no injection tag
fn inject_pass(
    html: &str,
    templates: &TemplateRegistry,
    values: &mut ValueMap,
) -> Result<Option<String>, InjectError> {
    let tags = extract_tags(html, INJECT_TEMPLATE_TAG, false)?;
    if tags.is_empty() {
        return Ok(None);
    }
    debug!("injecting {} template(s)", tags.len());

    let mut output = String::with_capacity(html.len());
    let mut end_of_last_tag = 0;

    for tag in &tags {
        for (key, value) in tag.properties() {
            if key == INJECT_TEMPLATE_ID_PROPERTY {
                continue;
            }
            if !values.insert(key, value) {
                return Err(InjectError::DuplicateValue {
                    key: key.to_string(),
                    span: tag.outer_span(),
                });
            }
        }

        output.push_str(&html[end_of_last_tag..tag.start_span().start]);

        let id = tag.property(INJECT_TEMPLATE_ID_PROPERTY).ok_or_else(|| {
            InjectError::missing_property(
                INJECT_TEMPLATE_TAG,
                INJECT_TEMPLATE_ID_PROPERTY,
                tag.outer_span(),
            )
        })?;
        let template = templates.get(id).ok_or_else(|| InjectError::UnknownTemplate {
            id: id.to_string(),
            span: tag.outer_span(),
        })?;
        output.push_str(&template.text);

        end_of_last_tag = tag.end_offset();
    }

    output.push_str(&html[end_of_last_tag..]);
    Ok(Some(output))
}
