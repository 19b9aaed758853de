//! Seed data: the lesson materials shipped with the application
//!
//! Eight lessons (hiragana and katakana, vowels through the T-series),
//! five characters each. Seeding is idempotent: lessons already present
//! are skipped, so re-running never duplicates rows.

use crate::db::{queries, CharacterEntry, Db, NewMaterial, ScriptType};
use crate::Result;
use tracing::info;

struct SeedLesson {
    script: ScriptType,
    key: &'static str,
    name: &'static str,
    description: &'static str,
    characters: &'static [(&'static str, &'static str, &'static str)],
}

const SEED_LESSONS: &[SeedLesson] = &[
    SeedLesson {
        script: ScriptType::Hiragana,
        key: "vowels",
        name: "Vokal (A, I, U, E, O)",
        description: "Pelajari 5 huruf vokal dasar dalam hiragana",
        characters: &[
            ("あ", "a", "ah"),
            ("い", "i", "ee"),
            ("う", "u", "oo"),
            ("え", "e", "eh"),
            ("お", "o", "oh"),
        ],
    },
    SeedLesson {
        script: ScriptType::Hiragana,
        key: "k-series",
        name: "K-Series (KA, KI, KU, KE, KO)",
        description: "Pelajari huruf-huruf dengan bunyi K",
        characters: &[
            ("か", "ka", "kah"),
            ("き", "ki", "kee"),
            ("く", "ku", "koo"),
            ("け", "ke", "keh"),
            ("こ", "ko", "koh"),
        ],
    },
    SeedLesson {
        script: ScriptType::Hiragana,
        key: "s-series",
        name: "S-Series (SA, SHI, SU, SE, SO)",
        description: "Pelajari huruf-huruf dengan bunyi S",
        characters: &[
            ("さ", "sa", "sah"),
            ("し", "shi", "shee"),
            ("す", "su", "soo"),
            ("せ", "se", "seh"),
            ("そ", "so", "soh"),
        ],
    },
    SeedLesson {
        script: ScriptType::Hiragana,
        key: "t-series",
        name: "T-Series (TA, CHI, TSU, TE, TO)",
        description: "Pelajari huruf-huruf dengan bunyi T",
        characters: &[
            ("た", "ta", "tah"),
            ("ち", "chi", "chee"),
            ("つ", "tsu", "tsoo"),
            ("て", "te", "teh"),
            ("と", "to", "toh"),
        ],
    },
    SeedLesson {
        script: ScriptType::Katakana,
        key: "vowels",
        name: "Vokal (A, I, U, E, O)",
        description: "Pelajari 5 huruf vokal dasar dalam katakana",
        characters: &[
            ("ア", "a", "ah"),
            ("イ", "i", "ee"),
            ("ウ", "u", "oo"),
            ("エ", "e", "eh"),
            ("オ", "o", "oh"),
        ],
    },
    SeedLesson {
        script: ScriptType::Katakana,
        key: "k-series",
        name: "K-Series (KA, KI, KU, KE, KO)",
        description: "Pelajari huruf-huruf dengan bunyi K",
        characters: &[
            ("カ", "ka", "kah"),
            ("キ", "ki", "kee"),
            ("ク", "ku", "koo"),
            ("ケ", "ke", "keh"),
            ("コ", "ko", "koh"),
        ],
    },
    SeedLesson {
        script: ScriptType::Katakana,
        key: "s-series",
        name: "S-Series (SA, SHI, SU, SE, SO)",
        description: "Pelajari huruf-huruf dengan bunyi S",
        characters: &[
            ("サ", "sa", "sah"),
            ("シ", "shi", "shee"),
            ("ス", "su", "soo"),
            ("セ", "se", "seh"),
            ("ソ", "so", "soh"),
        ],
    },
    SeedLesson {
        script: ScriptType::Katakana,
        key: "t-series",
        name: "T-Series (TA, CHI, TSU, TE, TO)",
        description: "Pelajari huruf-huruf dengan bunyi T",
        characters: &[
            ("タ", "ta", "tah"),
            ("チ", "chi", "chee"),
            ("ツ", "tsu", "tsoo"),
            ("テ", "te", "teh"),
            ("ト", "to", "toh"),
        ],
    },
];

/// Insert any missing seed lessons. Returns the number inserted.
pub async fn seed_materials(db: &Db) -> Result<u32> {
    let mut inserted = 0;

    for lesson in SEED_LESSONS {
        if queries::exists(db, lesson.script, lesson.key).await? {
            continue;
        }

        let material = NewMaterial {
            script_type: lesson.script,
            lesson_key: lesson.key.to_string(),
            lesson_name: lesson.name.to_string(),
            description: lesson.description.to_string(),
            characters: lesson
                .characters
                .iter()
                .map(|&(jp, romaji, sound)| CharacterEntry {
                    jp: jp.to_string(),
                    romaji: romaji.to_string(),
                    sound: sound.to_string(),
                })
                .collect(),
        };

        queries::insert_material(db, &material).await?;
        inserted += 1;
    }

    if inserted > 0 {
        info!("Seeded {} lesson materials", inserted);
    } else {
        info!("Seed lessons already present, nothing to do");
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_set_covers_both_scripts() {
        let hiragana = SEED_LESSONS
            .iter()
            .filter(|l| l.script == ScriptType::Hiragana)
            .count();
        let katakana = SEED_LESSONS
            .iter()
            .filter(|l| l.script == ScriptType::Katakana)
            .count();
        assert_eq!(hiragana, 4);
        assert_eq!(katakana, 4);
    }

    #[test]
    fn seed_lessons_have_five_characters_each() {
        for lesson in SEED_LESSONS {
            assert_eq!(
                lesson.characters.len(),
                5,
                "lesson {}/{} should have 5 characters",
                lesson.script,
                lesson.key
            );
        }
    }

    #[test]
    fn seed_keys_unique_per_script() {
        for (i, a) in SEED_LESSONS.iter().enumerate() {
            for b in &SEED_LESSONS[i + 1..] {
                assert!(
                    !(a.script == b.script && a.key == b.key),
                    "duplicate seed lesson {}/{}",
                    a.script,
                    a.key
                );
            }
        }
    }
}
