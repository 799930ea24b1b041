use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PageId);
id_newtype!(InvalidationToken);

impl InvalidationToken {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Player identity, unique within a match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Candidate descriptor as returned by the encyclopedia query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "pageid")]
    pub page_id: PageId,
    pub title: String,
    pub length: u64,
    #[serde(rename = "fullurl")]
    pub full_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Choosing,
    Reading,
    Preguessing,
    Guessing,
    Recap,
}

impl Stage {
    pub fn next(self) -> Option<Self> {
        match self {
            Stage::Choosing => Some(Stage::Reading),
            Stage::Reading => Some(Stage::Preguessing),
            Stage::Preguessing => Some(Stage::Guessing),
            Stage::Guessing => Some(Stage::Recap),
            Stage::Recap => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Choosing => "choosing",
            Stage::Reading => "reading",
            Stage::Preguessing => "preguessing",
            Stage::Guessing => "guessing",
            Stage::Recap => "recap",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_walk_forward_to_recap() {
        let mut stage = Stage::Choosing;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            stage = next;
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                Stage::Choosing,
                Stage::Reading,
                Stage::Preguessing,
                Stage::Guessing,
                Stage::Recap
            ]
        );
    }

    #[test]
    fn article_uses_wire_field_names() {
        let article: Article = serde_json::from_str(
            r#"{"pageid":42,"ns":0,"title":"Otter","length":12000,"fullurl":"https://en.wikipedia.org/wiki/Otter"}"#,
        )
        .expect("article");
        assert_eq!(article.page_id, PageId(42));
        assert_eq!(article.title, "Otter");
        assert_eq!(article.full_url, "https://en.wikipedia.org/wiki/Otter");
    }
}
