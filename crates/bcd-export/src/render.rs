//! Plain-text rendering of the summary for the terminal front end.

use serde::Serialize;
use tera::{Context, Tera};

use bcd_core::summary::{Field, QuickPreview, SectionContent, SummaryView};

use crate::error::ExportError;

pub const NO_IMAGE_PREVIEW: &str = "No Image Preview Available";

const REVIEW_TEMPLATE: &str = "\
Review Your Submission
Please review all information and imaging below before final submission.
{% for section in sections %}
[ {{ section.title }} ]
{%- for field in section.fields %}
  {{ field.label }}: {{ field.value }}
{%- endfor %}
{%- for item in section.items %}
  \u{2022} {{ item }}
{%- endfor %}
{%- if section.image_preview %}
  {{ section.image_preview }}
{%- endif %}
{% endfor -%}
";

const PREVIEW_TEMPLATE: &str = "\
Patient: {{ patient_name }} (ID: {{ patient_id }})
Study: {{ study_id }} on {{ study_date }}
Modality: {{ modality }}
Findings: {{ findings_count }} total findings across both breasts
Indicators: {{ indicators_count }} early detection indicators noted
Images: {{ images }}
";

#[derive(Serialize)]
struct ReviewContext<'a> {
    sections: Vec<ReviewSection<'a>>,
}

#[derive(Serialize)]
struct ReviewSection<'a> {
    title: &'a str,
    fields: Vec<&'a Field>,
    items: &'a [String],
    image_preview: Option<String>,
}

/// Render a Tera template against any serializable context.
pub fn render_template<T: Serialize>(
    template_name: &str,
    template_content: &str,
    context: &T,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(context)?;
    let context = Context::from_value(value)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    Ok(tera.render(template_name, &context)?)
}

/// The review screen: every non-empty section, empty-string fields omitted,
/// the image path replaced by a preview line.
pub fn render_review(summary: &SummaryView) -> Result<String, ExportError> {
    let sections = summary
        .sections()
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(|s| match s.content {
            SectionContent::Fields(fields) => ReviewSection {
                title: s.title,
                fields: non_empty(fields),
                items: &[],
                image_preview: None,
            },
            SectionContent::List(items) => ReviewSection {
                title: s.title,
                fields: Vec::new(),
                items,
                image_preview: None,
            },
            SectionContent::Imaging(imaging) => ReviewSection {
                title: s.title,
                fields: non_empty(&imaging.fields),
                items: &[],
                image_preview: Some(match imaging.path.as_deref().filter(|p| p.is_file()) {
                    Some(path) => format!("Image preview: {}", path.display()),
                    None => NO_IMAGE_PREVIEW.to_string(),
                }),
            },
        })
        .collect();

    render_template("review.txt", REVIEW_TEMPLATE, &ReviewContext { sections })
}

/// The quick preview shown on the summary page.
pub fn render_preview(preview: &QuickPreview) -> Result<String, ExportError> {
    render_template("preview.txt", PREVIEW_TEMPLATE, preview)
}

fn non_empty(fields: &[Field]) -> Vec<&Field> {
    fields.iter().filter(|f| !f.value.is_empty()).collect()
}
