//! Built-in learning content: level descriptions, graded flashcards and stories.

use crate::models::{Level, LevelInfo, Story, VocabularyCard};

const A1_WORDS: [(&str, &str); 9] = [
    ("Hello", "Ahoj"),
    ("Goodbye", "Sbohem"),
    ("Please", "Prosím"),
    ("Thank you", "Děkuji"),
    ("Yes", "Ano"),
    ("No", "Ne"),
    ("Name", "Jméno"),
    ("Family", "Rodina"),
    ("Friend", "Přítel"),
];

const A2_WORDS: [(&str, &str); 9] = [
    ("Breakfast", "Snídaně"),
    ("Lunch", "Oběd"),
    ("Dinner", "Večeře"),
    ("Market", "Trh"),
    ("Shop", "Obchod"),
    ("Money", "Peníze"),
    ("Ticket", "Lístek"),
    ("Bus", "Autobus"),
    ("Train", "Vlak"),
];

const B1_WORDS: [(&str, &str); 9] = [
    ("Journey", "Cesta"),
    ("Experience", "Zkušenost"),
    ("Advice", "Rada"),
    ("Opinion", "Názor"),
    ("Choice", "Volba"),
    ("Chance", "Šance"),
    ("Success", "Úspěch"),
    ("Failure", "Neúspěch"),
    ("Goal", "Cíl"),
];

const B2_WORDS: [(&str, &str); 9] = [
    ("Environment", "Prostředí"),
    ("Development", "Rozvoj"),
    ("Research", "Výzkum"),
    ("Solution", "Řešení"),
    ("Resource", "Zdroj"),
    ("Network", "Síť"),
    ("Industry", "Průmysl"),
    ("Economy", "Ekonomika"),
    ("Policy", "Politika"),
];

const C1_WORDS: [(&str, &str); 9] = [
    ("Comprehensive", "Komplexní"),
    ("Substantial", "Podstatný"),
    ("Ambiguous", "Nejednoznačný"),
    ("Notion", "Pojem"),
    ("Perception", "Vnímání"),
    ("Phenomenon", "Jev"),
    ("Framework", "Rámec"),
    ("Paradigm", "Paradigma"),
    ("Discrepancy", "Nesoulad"),
];

const C2_WORDS: [(&str, &str); 9] = [
    ("Ephemeral", "Pomíjivý"),
    ("Quintessential", "Typický"),
    ("Obfuscate", "Zatemnit"),
    ("Serendipity", "Šťastná náhoda"),
    ("Ubiquitous", "Všudypřítomný"),
    ("Juxtaposition", "Srovnání"),
    ("Vicissitude", "Zvrat"),
    ("Ineffable", "Nevyjádřitelný"),
    ("Ebullient", "Nadšený"),
];

const STORIES: [(&str, &str, &str); 4] = [
    (
        "1",
        "A Day at the Park",
        "It was a sunny day. Anna went to the park with her dog. They played with a ball and met new friends.",
    ),
    (
        "2",
        "The Lost Key",
        "Tom could not find his key. He looked everywhere. Finally, he found it in his pocket.",
    ),
    (
        "3",
        "Holiday Trip",
        "Our family went to the mountains. We hiked, took photos, and enjoyed the fresh air.",
    ),
    (
        "4",
        "Birthday Surprise",
        "Sara's friends organized a surprise party. She was very happy and thanked everyone.",
    ),
];

/// All levels, easiest first.
pub fn levels() -> Vec<LevelInfo> {
    Level::ALL.iter().map(Level::info).collect()
}

/// The flashcards of one level. Card ids look like `b2-4`.
pub fn vocabulary_for(level: Level) -> Vec<VocabularyCard> {
    let words = match level {
        Level::A1 => &A1_WORDS,
        Level::A2 => &A2_WORDS,
        Level::B1 => &B1_WORDS,
        Level::B2 => &B2_WORDS,
        Level::C1 => &C1_WORDS,
        Level::C2 => &C2_WORDS,
    };
    let prefix = level.as_str().to_ascii_lowercase();

    words
        .iter()
        .enumerate()
        .map(|(index, (english, czech))| VocabularyCard {
            id: format!("{}-{}", prefix, index + 1),
            english: english.to_string(),
            czech: czech.to_string(),
            level,
        })
        .collect()
}

pub fn stories() -> Vec<Story> {
    STORIES
        .iter()
        .map(|(id, title, text)| Story {
            id: id.to_string(),
            title: title.to_string(),
            text: text.to_string(),
            audio_url: format!("/audio/{}.mp3", id),
        })
        .collect()
}

pub fn story(id: &str) -> Option<Story> {
    stories().into_iter().find(|story| story.id == id.trim())
}
