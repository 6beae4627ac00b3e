//! Lookup tables behind the built-in operations
//!
//! Loaded once at startup (built-in defaults or a TOML data file) and shared
//! read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// One translation table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub text: String,
    pub language: String,
    pub translation: String,
}

/// Recommended titles for one genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreEntry {
    pub genre: String,
    pub titles: Vec<String>,
}

/// Immutable data for weather, translation and movie operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// location -> weather summary
    #[serde(default)]
    pub weather: BTreeMap<String, String>,

    #[serde(default)]
    pub translations: Vec<TranslationEntry>,

    #[serde(default)]
    pub movies: Vec<GenreEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        let weather = [
            ("서울", "맑음, 22°C"),
            ("부산", "흐림, 20°C"),
            ("제주", "비, 18°C"),
            ("대전", "구름 조금, 23°C"),
            ("광주", "맑음, 24°C"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let translations = [
            ("안녕하세요", "영어", "Hello"),
            ("안녕하세요", "일본어", "こんにちは"),
            ("안녕하세요", "중국어", "你好"),
            ("감사합니다", "영어", "Thank you"),
            ("감사합니다", "일본어", "ありがとうございます"),
            ("감사합니다", "중국어", "谢谢"),
        ]
        .into_iter()
        .map(|(text, language, translation)| TranslationEntry {
            text: text.to_string(),
            language: language.to_string(),
            translation: translation.to_string(),
        })
        .collect();

        let movies = [
            ("액션", ["다이 하드", "매드 맥스: 분노의 도로", "존 윅"]),
            ("코미디", ["행오버", "브라이즈메이드", "슈퍼배드"]),
            ("로맨스", ["노트북", "비포 선라이즈", "어바웃 타임"]),
            ("SF", ["인터스텔라", "매트릭스", "블레이드 러너 2049"]),
            ("공포", ["샤이닝", "컨저링", "겟 아웃"]),
        ]
        .into_iter()
        .map(|(genre, titles)| GenreEntry {
            genre: genre.to_string(),
            titles: titles.iter().map(|t| t.to_string()).collect(),
        })
        .collect();

        Self {
            weather,
            translations,
            movies,
        }
    }

    /// Load a catalog from a TOML data file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn weather(&self, location: &str) -> Option<&str> {
        self.weather.get(location).map(String::as_str)
    }

    pub fn translation(&self, text: &str, language: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|e| e.text == text && e.language == language)
            .map(|e| e.translation.as_str())
    }

    pub fn movies(&self, genre: &str) -> &[String] {
        self.movies
            .iter()
            .find(|e| e.genre == genre)
            .map(|e| e.titles.as_slice())
            .unwrap_or(&[])
    }

    /// Genres in table order
    pub fn genres(&self) -> Vec<&str> {
        self.movies.iter().map(|e| e.genre.as_str()).collect()
    }

    /// Target languages in first-seen order, without repeats
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = Vec::new();
        for entry in &self.translations {
            if !languages.contains(&entry.language.as_str()) {
                languages.push(&entry.language);
            }
        }
        languages
    }
}
