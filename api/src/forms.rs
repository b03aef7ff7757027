//! Input validation, kept apart from persistence: every `clean` returns either
//! data ready to be stored or field-level errors, and never touches a table
//! beyond read-only lookups.

use crate::store::Store;
use axum::body::Bytes;
use image::ImageFormat;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// A file field as received from a multipart body.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Raw post form as submitted for create and edit.
#[derive(Debug, Default, Clone)]
pub struct PostForm {
    pub text: String,
    /// Group id as typed into the form; empty means "no group".
    pub group: String,
    pub image: Option<Upload>,
}

#[derive(Debug, Clone)]
pub struct CleanImage {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// A post form that passed validation.
#[derive(Debug, Clone)]
pub struct CleanPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<CleanImage>,
}

#[derive(Validate)]
struct TextField {
    #[validate(length(min = 1, message = "This field is required."))]
    text: String,
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

impl PostForm {
    pub fn clean(&self, store: &Store) -> Result<CleanPost, ValidationErrors> {
        let text = TextField {
            text: self.text.trim().to_string(),
        };
        let mut errors = match text.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let group_id = match self.group.trim() {
            "" => None,
            raw => match raw.parse::<i64>() {
                Ok(id) if store.group_exists(id) => Some(id),
                _ => {
                    errors.add(
                        "group",
                        field_error(
                            "invalid_choice",
                            "Select a valid choice. That choice is not one of the available choices.",
                        ),
                    );
                    None
                }
            },
        };

        let image = match &self.image {
            Some(upload) if !upload.bytes.is_empty() => match image_content_type(&upload.bytes) {
                Some(content_type) => Some(CleanImage {
                    file_name: sanitize_file_name(&upload.file_name),
                    content_type,
                    bytes: upload.bytes.clone(),
                }),
                None => {
                    errors.add(
                        "image",
                        field_error(
                            "invalid_image",
                            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
                        ),
                    );
                    None
                }
            },
            _ => None,
        };

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(CleanPost {
            text: text.text,
            group_id,
            image,
        })
    }
}

/// Content type of an upload that fully decodes as one of the accepted
/// formats. Correct magic bytes in front of garbage are not enough.
pub fn image_content_type(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    let content_type = match format {
        ImageFormat::Gif => "image/gif",
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        _ => return None,
    };
    image::load_from_memory_with_format(bytes, format).ok()?;
    Some(content_type)
}

/// Last path component only, without anything that could escape `posts/`.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
}

impl CommentForm {
    pub fn clean(mut self) -> Result<String, ValidationErrors> {
        self.text = self.text.trim().to_string();
        self.validate()?;
        Ok(self.text)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct GroupForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 50))]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

impl GroupForm {
    pub fn clean(self) -> Result<GroupForm, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        let slug_ok = self
            .slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !slug_ok {
            errors.add(
                "slug",
                field_error(
                    "invalid_slug",
                    "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
                ),
            );
        }
        if errors.errors().is_empty() {
            Ok(self)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::SMALL_GIF;

    fn form(text: &str, group: &str, image: Option<&'static [u8]>) -> PostForm {
        PostForm {
            text: text.to_string(),
            group: group.to_string(),
            image: image.map(|bytes| Upload {
                file_name: "small.gif".into(),
                content_type: Some("image/gif".into()),
                bytes: Bytes::from_static(bytes),
            }),
        }
    }

    #[test]
    fn blank_text_is_rejected() {
        let store = Store::new();
        let errors = form("   ", "", None).clean(&store).unwrap_err();
        assert!(errors.field_errors().contains_key("text"));
    }

    #[test]
    fn text_is_trimmed() {
        let store = Store::new();
        let clean = form("  hello  ", "", None).clean(&store).unwrap();
        assert_eq!(clean.text, "hello");
        assert!(clean.group_id.is_none());
    }

    #[test]
    fn unknown_group_is_rejected() {
        let store = Store::new();
        let errors = form("hello", "42", None).clean(&store).unwrap_err();
        assert!(errors.field_errors().contains_key("group"));

        let errors = form("hello", "not-a-number", None).clean(&store).unwrap_err();
        assert!(errors.field_errors().contains_key("group"));
    }

    #[test]
    fn known_group_is_accepted() {
        let store = Store::new();
        let group = store
            .insert_group("Test".into(), "test".into(), String::new())
            .unwrap();
        let clean = form("hello", &group.id.to_string(), None).clean(&store).unwrap();
        assert_eq!(clean.group_id, Some(group.id));
    }

    #[test]
    fn gif_upload_is_accepted() {
        let store = Store::new();
        let clean = form("hello", "", Some(SMALL_GIF)).clean(&store).unwrap();
        let image = clean.image.unwrap();
        assert_eq!(image.content_type, "image/gif");
        assert_eq!(image.file_name, "small.gif");
    }

    #[test]
    fn non_image_upload_is_rejected() {
        let store = Store::new();
        let errors = form("hello", "", Some(&b"plain text, not an image"[..]))
            .clean(&store)
            .unwrap_err();
        assert!(errors.field_errors().contains_key("image"));
    }

    #[test]
    fn corrupt_image_behind_valid_magic_is_rejected() {
        let store = Store::new();
        for bytes in [&b"GIF89a this is not an image at all"[..], &SMALL_GIF[..20]] {
            let errors = form("hello", "", Some(bytes)).clean(&store).unwrap_err();
            assert!(errors.field_errors().contains_key("image"));
        }
        assert!(image_content_type(b"BM and then some more bytes").is_none());
    }

    #[test]
    fn empty_upload_counts_as_no_image() {
        let store = Store::new();
        let clean = form("hello", "", Some(&b""[..])).clean(&store).unwrap();
        assert!(clean.image.is_none());
    }

    #[test]
    fn file_names_cannot_escape() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\cat pic.png"), "cat_pic.png");
        assert_eq!(sanitize_file_name(".."), "upload");
    }

    #[test]
    fn comment_needs_text() {
        let blank = CommentForm { text: " ".into() };
        assert!(blank.clean().is_err());
        let ok = CommentForm { text: " nice ".into() };
        assert_eq!(ok.clean().unwrap(), "nice");
    }

    #[test]
    fn slug_characters_are_checked() {
        let bad = GroupForm {
            title: "Cats".into(),
            slug: "cats and dogs".into(),
            description: String::new(),
        };
        assert!(bad.clean().unwrap_err().field_errors().contains_key("slug"));

        let good = GroupForm {
            title: "Cats".into(),
            slug: "cats_and-dogs".into(),
            description: String::new(),
        };
        assert!(good.clean().is_ok());
    }
}
