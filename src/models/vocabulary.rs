use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::level::Level;
use super::progress::ProgressColor;

pub const TITLE_MAX_LEN: usize = 200;
pub const WORD_MAX_LEN: usize = 200;
pub const IMAGE_URL_MAX_LEN: usize = 2048;

/// Built-in flashcard: an English word with its Czech translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyCard {
    pub id: String,
    pub english: String,
    pub czech: String,
    pub level: Level,
}

/// A user-created list of words to practise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyList {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub words: Vec<ListWord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListWord {
    pub word: String,
    pub translation: String,
    pub image_url: Option<String>,
}

/// Row of `GET /api/lists`.
#[derive(Debug, Clone, Serialize)]
pub struct ListSummary {
    pub id: Uuid,
    pub title: String,
    pub total_words: usize,
    pub progress: u32,
    pub color: ProgressColor,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub title: String,
    pub words: Vec<ListWord>,
}

impl VocabularyList {
    pub fn new(owner_id: Uuid, title: String, words: Vec<ListWord>) -> Self {
        let now = Utc::now();

        VocabularyList {
            id: Uuid::new_v4(),
            owner_id,
            title,
            words,
            created_at: now,
            updated_at: now,
        }
    }
}

impl CreateListRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }

        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(format!("Title cannot exceed {} characters", TITLE_MAX_LEN));
        }

        if self.words.is_empty() {
            return Err("A list needs at least one word".to_string());
        }

        for (index, entry) in self.words.iter().enumerate() {
            let position = index + 1;

            if entry.word.trim().is_empty() {
                return Err(format!("Word {} cannot be empty", position));
            }

            if entry.translation.trim().is_empty() {
                return Err(format!("Translation of word {} cannot be empty", position));
            }

            if entry.word.chars().count() > WORD_MAX_LEN
                || entry.translation.chars().count() > WORD_MAX_LEN
            {
                return Err(format!("Word {} cannot exceed {} characters", position, WORD_MAX_LEN));
            }

            if let Some(ref url) = entry.image_url {
                if url.len() > IMAGE_URL_MAX_LEN {
                    return Err(format!("Image URL of word {} is too long", position));
                }
            }
        }

        Ok(())
    }

    /// Validates, trims every field and drops blank image URLs.
    pub fn into_list(self, owner_id: Uuid) -> Result<VocabularyList, String> {
        self.validate()?;

        let words = self
            .words
            .into_iter()
            .map(|entry| ListWord {
                word: entry.word.trim().to_string(),
                translation: entry.translation.trim().to_string(),
                image_url: entry
                    .image_url
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty()),
            })
            .collect();

        Ok(VocabularyList::new(owner_id, self.title.trim().to_string(), words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(word: &str, translation: &str, image_url: Option<&str>) -> ListWord {
        ListWord {
            word: word.to_string(),
            translation: translation.to_string(),
            image_url: image_url.map(str::to_string),
        }
    }

    #[test]
    fn test_create_list_request_validation() {
        let valid = CreateListRequest {
            title: "Travel".to_string(),
            words: vec![word("Ticket", "Lístek", None)],
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateListRequest {
            title: "  ".to_string(),
            words: vec![word("Ticket", "Lístek", None)],
        };
        assert!(empty_title.validate().is_err());

        let no_words = CreateListRequest {
            title: "Travel".to_string(),
            words: vec![],
        };
        assert!(no_words.validate().is_err());

        let missing_translation = CreateListRequest {
            title: "Travel".to_string(),
            words: vec![word("Ticket", "Lístek", None), word("Bus", " ", None)],
        };
        assert_eq!(
            missing_translation.validate().unwrap_err(),
            "Translation of word 2 cannot be empty"
        );

        let long_title = CreateListRequest {
            title: "t".repeat(TITLE_MAX_LEN + 1),
            words: vec![word("Ticket", "Lístek", None)],
        };
        assert!(long_title.validate().is_err());
    }

    #[test]
    fn test_into_list_normalizes_words() {
        let owner = Uuid::new_v4();
        let request = CreateListRequest {
            title: "  Food ".to_string(),
            words: vec![
                word(" Breakfast ", " Snídaně", Some("   ")),
                word("Lunch", "Oběd", Some(" https://img.example.com/lunch.jpg ")),
            ],
        };

        let list = request.into_list(owner).unwrap();

        assert_eq!(list.owner_id, owner);
        assert_eq!(list.title, "Food");
        assert_eq!(list.words[0], word("Breakfast", "Snídaně", None));
        assert_eq!(
            list.words[1].image_url.as_deref(),
            Some("https://img.example.com/lunch.jpg")
        );
        assert_eq!(list.created_at, list.updated_at);
    }

    #[test]
    fn test_create_list_request_deserialization() {
        let json = r#"{"title":"Travel","words":[{"word":"Bus","translation":"Autobus","image_url":null},{"word":"Train","translation":"Vlak","image_url":"/img/train.png"}]}"#;

        let request: CreateListRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.words.len(), 2);
        assert_eq!(request.words[0].image_url, None);
        assert_eq!(request.words[1].image_url.as_deref(), Some("/img/train.png"));
    }
}
