//! Field rules for the post editor.
//!
//! Every field is checked against its ordered rule list; the first failing
//! rule supplies that field's message and later rules for the same field
//! are skipped. All fields are always evaluated so the caller receives the
//! complete set of violations at once.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use imagesize::ImageType;
use uuid::Uuid;

use crate::domain::types::PostStatus;

use super::types::{PostEditorForm, UploadedImage};

pub const MAX_IMAGE_KILOBYTES: u64 = 2048;
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Categories,
    Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Stop checking the field when no value was provided.
    Nullable,
    Required,
    ExistsIn(Lookup),
    PostStatus,
    Image,
    Mimes(&'static [&'static str]),
    MaxKilobytes(u64),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

pub const POST_EDITOR_RULES: &[FieldRules] = &[
    FieldRules {
        field: "content",
        rules: &[Rule::Required],
    },
    FieldRules {
        field: "category_id",
        rules: &[Rule::Required, Rule::ExistsIn(Lookup::Categories)],
    },
    FieldRules {
        field: "tags",
        rules: &[Rule::Required, Rule::ExistsIn(Lookup::Tags)],
    },
    FieldRules {
        field: "status",
        rules: &[Rule::Required, Rule::PostStatus],
    },
    FieldRules {
        field: "image",
        rules: &[
            Rule::Nullable,
            Rule::Image,
            Rule::Mimes(IMAGE_EXTENSIONS),
            Rule::MaxKilobytes(MAX_IMAGE_KILOBYTES),
        ],
    },
];

/// Field name to message mapping produced by a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields.keys().copied().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Ids confirmed to exist by the lookup tables.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    pub categories: HashSet<Uuid>,
    pub tags: HashSet<Uuid>,
}

/// Typed values extracted from a form that passed every rule.
#[derive(Debug, Clone)]
pub struct ValidatedPost {
    pub content: String,
    pub category_id: Uuid,
    pub tag_ids: Vec<Uuid>,
    pub status: PostStatus,
    pub image: Option<ValidatedImage>,
}

/// An upload that passed the image rules, typed by its bytes.
#[derive(Debug, Clone)]
pub struct ValidatedImage {
    pub upload: UploadedImage,
    /// Extension of the sniffed format, `png` or `jpg`.
    pub extension: &'static str,
}

impl ValidatedImage {
    pub fn mime_type(&self) -> &'static str {
        match self.extension {
            "png" => "image/png",
            _ => "image/jpeg",
        }
    }

    /// The client's file stem joined to the sniffed extension.
    pub fn stored_filename(&self) -> String {
        let stem = Path::new(&self.upload.filename)
            .file_stem()
            .and_then(|value| value.to_str())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or("upload");
        format!("{stem}.{}", self.extension)
    }

    /// Whether the client-declared content type disagrees with the bytes.
    pub fn declared_type_mismatch(&self) -> bool {
        let declared = self.upload.content_type.trim();
        !(declared.eq_ignore_ascii_case(self.mime_type())
            || (self.extension == "jpg" && declared.eq_ignore_ascii_case("image/jpg")))
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldValue<'a> {
    Text(&'a str),
    List(&'a [String]),
    File(Option<&'a UploadedImage>),
    Missing,
}

impl FieldValue<'_> {
    fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(value) => !value.trim().is_empty(),
            FieldValue::List(values) => values.iter().any(|value| !value.trim().is_empty()),
            FieldValue::File(file) => file.is_some(),
            FieldValue::Missing => false,
        }
    }
}

fn field_value<'a>(form: &'a PostEditorForm, field: &str) -> FieldValue<'a> {
    match field {
        "content" => FieldValue::Text(&form.content),
        "category_id" => FieldValue::Text(&form.category_id),
        "tags" => FieldValue::List(&form.tags),
        "status" => FieldValue::Text(&form.status),
        "image" => FieldValue::File(form.image.as_ref()),
        _ => FieldValue::Missing,
    }
}

fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

pub(crate) fn parse_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value.trim()).ok()
}

/// Non-blank submitted tag values, trimmed, in submission order.
pub(crate) fn submitted_tags(form: &PostEditorForm) -> impl Iterator<Item = &str> {
    form.tags
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Parsed tag ids with duplicates removed, first occurrence wins.
pub(crate) fn unique_tag_ids(form: &PostEditorForm) -> Vec<Uuid> {
    let mut seen = BTreeSet::new();
    submitted_tags(form)
        .filter_map(parse_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Extensions matching the sniffed content, not the client-supplied name.
fn detected_extensions(image: &UploadedImage) -> &'static [&'static str] {
    match imagesize::image_type(&image.data) {
        Ok(ImageType::Jpeg) => &["jpg", "jpeg"],
        Ok(ImageType::Png) => &["png"],
        _ => &[],
    }
}

impl Rule {
    fn check(
        self,
        field: &str,
        value: FieldValue<'_>,
        context: &ValidationContext,
    ) -> Result<(), String> {
        let name = attribute(field);
        match self {
            Rule::Nullable => Ok(()),
            Rule::Required => {
                if value.is_present() {
                    Ok(())
                } else {
                    Err(format!("The {name} field is required."))
                }
            }
            Rule::ExistsIn(lookup) => {
                let known = match lookup {
                    Lookup::Categories => &context.categories,
                    Lookup::Tags => &context.tags,
                };
                let all_known = match value {
                    FieldValue::Text(text) => parse_id(text).is_some_and(|id| known.contains(&id)),
                    FieldValue::List(values) => values
                        .iter()
                        .map(|value| value.trim())
                        .filter(|value| !value.is_empty())
                        .all(|value| parse_id(value).is_some_and(|id| known.contains(&id))),
                    FieldValue::File(_) | FieldValue::Missing => false,
                };
                if all_known {
                    Ok(())
                } else {
                    Err(format!("The selected {name} is invalid."))
                }
            }
            Rule::PostStatus => match value {
                FieldValue::Text(text) if text.parse::<PostStatus>().is_ok() => Ok(()),
                _ => Err(format!("The selected {name} is invalid.")),
            },
            Rule::Image => match value {
                FieldValue::File(Some(image)) if imagesize::blob_size(&image.data).is_ok() => {
                    Ok(())
                }
                _ => Err(format!("The {name} field must be an image.")),
            },
            Rule::Mimes(allowed) => {
                let accepted = match value {
                    FieldValue::File(Some(image)) => detected_extensions(image)
                        .iter()
                        .any(|ext| allowed.contains(ext)),
                    _ => false,
                };
                if accepted {
                    Ok(())
                } else {
                    Err(format!(
                        "The {name} field must be a file of type: {}.",
                        allowed.join(", ")
                    ))
                }
            }
            Rule::MaxKilobytes(limit) => match value {
                FieldValue::File(Some(image)) if image.size_bytes() > limit * 1024 => Err(format!(
                    "The {name} field must not be greater than {limit} kilobytes."
                )),
                _ => Ok(()),
            },
        }
    }
}

impl FieldRules {
    fn evaluate(&self, form: &PostEditorForm, context: &ValidationContext) -> Result<(), String> {
        let value = field_value(form, self.field);
        for rule in self.rules {
            if *rule == Rule::Nullable && !value.is_present() {
                return Ok(());
            }
            rule.check(self.field, value, context)?;
        }
        Ok(())
    }
}

/// Check `form` against [`POST_EDITOR_RULES`], collecting every violation.
pub fn validate(
    form: &PostEditorForm,
    context: &ValidationContext,
) -> Result<ValidatedPost, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for field_rules in POST_EDITOR_RULES {
        if let Err(message) = field_rules.evaluate(form, context) {
            errors.insert(field_rules.field, message);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let Some(category_id) = parse_id(&form.category_id) else {
        errors.insert("category_id", "The selected category id is invalid.");
        return Err(errors);
    };
    let Ok(status) = form.status.parse::<PostStatus>() else {
        errors.insert("status", "The selected status is invalid.");
        return Err(errors);
    };
    let image = match &form.image {
        Some(upload) => {
            let Some(extension) = detected_extensions(upload).first().copied() else {
                errors.insert("image", "The image field must be an image.");
                return Err(errors);
            };
            Some(ValidatedImage {
                upload: upload.clone(),
                extension,
            })
        }
        None => None,
    };

    Ok(ValidatedPost {
        content: form.content.clone(),
        category_id,
        tag_ids: unique_tag_ids(form),
        status,
        image,
    })
}
