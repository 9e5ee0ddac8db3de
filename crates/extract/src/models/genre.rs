//! FB2 genre-code descriptions.
//!
//! FB2 documents tag books with short genre codes from the FictionBook
//! schema (`sf_fantasy`, `det_classic`, ...). The catalog stores the code
//! verbatim; this table only supplies a human-readable description for
//! display. Codes outside the table fall back to [`UNKNOWN_GENRE`] rather
//! than failing - collections in the wild contain plenty of home-grown tags.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Display value for genre codes missing from the table.
pub const UNKNOWN_GENRE: &str = "unknown";

/// Returns the human-readable description of an FB2 genre code.
///
/// # Examples
///
/// ```
/// use folio_extract::models::describe_genre;
///
/// assert_eq!(describe_genre("sf"), "Science Fiction");
/// assert_eq!(describe_genre("garden_gnomes"), "unknown");
/// ```
pub fn describe_genre(code: &str) -> &'static str {
    GENRE_TITLES.get(code).copied().unwrap_or(UNKNOWN_GENRE)
}

/// Map of FB2 genre codes to display descriptions.
///
/// Built from the genre list of the FictionBook 2.1 schema.
static GENRE_TITLES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("sf", "Science Fiction"),
        ("sf_history", "Alternative History"),
        ("sf_action", "Action Science Fiction"),
        ("sf_epic", "Epic Science Fiction"),
        ("sf_heroic", "Heroic Science Fiction"),
        ("sf_detective", "Detective Science Fiction"),
        ("sf_cyberpunk", "Cyberpunk"),
        ("sf_space", "Space Opera"),
        ("sf_social", "Social Science Fiction"),
        ("sf_horror", "Horror & Mystic"),
        ("sf_humor", "Humorous Science Fiction"),
        ("sf_fantasy", "Fantasy"),
        ("det_classic", "Classical Detective"),
        ("det_police", "Police Procedural"),
        ("det_action", "Action Detective"),
        ("det_irony", "Ironical Detective"),
        ("det_history", "Historical Detective"),
        ("det_espionage", "Espionage Detective"),
        ("det_crime", "Crime Detective"),
        ("det_political", "Political Detective"),
        ("det_maniac", "Maniac Detective"),
        ("det_hard", "Hard-boiled Detective"),
        ("thriller", "Thriller"),
        ("detective", "Detective"),
        ("prose_classic", "Classical Prose"),
        ("prose_history", "Historical Prose"),
        ("prose_contemporary", "Contemporary Prose"),
        ("prose_counter", "Counterculture"),
        ("prose_rus_classic", "Russian Classical Prose"),
        ("prose_su_classics", "Soviet Classical Prose"),
        ("love_contemporary", "Contemporary Romance"),
        ("love_history", "Historical Romance"),
        ("love_detective", "Romantic Suspense"),
        ("love_short", "Short Romance"),
        ("love_erotica", "Erotica"),
        ("adv_western", "Western"),
        ("adv_history", "Historical Adventure"),
        ("adv_indian", "Indian Adventure"),
        ("adv_maritime", "Maritime Fiction"),
        ("adv_geo", "Travel & Geography"),
        ("adv_animal", "Nature & Animals"),
        ("adventure", "Adventure"),
        ("child_tale", "Fairy Tales"),
        ("child_verse", "Children's Verses"),
        ("child_prose", "Children's Prose"),
        ("child_sf", "Children's Science Fiction"),
        ("child_det", "Children's Detective"),
        ("child_adv", "Children's Adventure"),
        ("child_education", "Children's Education"),
        ("children", "Children's Literature"),
        ("poetry", "Poetry"),
        ("dramaturgy", "Dramaturgy"),
        ("antique_ant", "Antique Literature"),
        ("antique_european", "European Antique Literature"),
        ("antique_russian", "Old Russian Literature"),
        ("antique_east", "Old Eastern Literature"),
        ("antique_myths", "Myths, Legends & Epos"),
        ("antique", "Antique Literature"),
        ("sci_history", "History"),
        ("sci_psychology", "Psychology"),
        ("sci_culture", "Cultural Science"),
        ("sci_religion", "Religious Studies"),
        ("sci_philosophy", "Philosophy"),
        ("sci_politics", "Politics"),
        ("sci_business", "Business Literature"),
        ("sci_juris", "Jurisprudence"),
        ("sci_linguistic", "Linguistics"),
        ("sci_medicine", "Medicine"),
        ("sci_phys", "Physics"),
        ("sci_math", "Mathematics"),
        ("sci_chem", "Chemistry"),
        ("sci_biology", "Biology"),
        ("sci_tech", "Technical Science"),
        ("science", "Science"),
        ("comp_www", "Internet"),
        ("comp_programming", "Programming"),
        ("comp_hard", "Computer Hardware"),
        ("comp_soft", "Software"),
        ("comp_db", "Databases"),
        ("comp_osnet", "OS & Networking"),
        ("computers", "Computers"),
        ("ref_encyc", "Encyclopedias"),
        ("ref_dict", "Dictionaries"),
        ("ref_ref", "Reference"),
        ("ref_guide", "Guidebooks"),
        ("reference", "Reference"),
        ("nonf_biography", "Biography & Memoirs"),
        ("nonf_publicism", "Publicism"),
        ("nonf_criticism", "Criticism"),
        ("nonfiction", "Nonfiction"),
        ("design", "Art & Design"),
        ("religion_rel", "Religion"),
        ("religion_esoterics", "Esoterics"),
        ("religion_self", "Self-improvement"),
        ("religion", "Religion & Spirituality"),
        ("humor_anecdote", "Anecdotes"),
        ("humor_prose", "Humorous Prose"),
        ("humor_verse", "Humorous Verses"),
        ("humor", "Humor"),
        ("home_cooking", "Cooking"),
        ("home_pets", "Pets"),
        ("home_crafts", "Hobbies & Crafts"),
        ("home_entertain", "Entertainment"),
        ("home_health", "Health"),
        ("home_garden", "Gardening"),
        ("home_diy", "Do-it-yourself"),
        ("home_sport", "Sports"),
        ("home_sex", "Family & Relationships"),
        ("home", "Home & Family"),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sf", "Science Fiction")]
    #[case("det_classic", "Classical Detective")]
    #[case("home_cooking", "Cooking")]
    fn known_codes(#[case] code: &str, #[case] title: &str) {
        assert_eq!(describe_genre(code), title);
    }

    #[rstest]
    #[case("")]
    #[case("no_such_genre")]
    #[case("SF")] // codes are case-sensitive
    fn unknown_codes(#[case] code: &str) {
        assert_eq!(describe_genre(code), UNKNOWN_GENRE);
    }
}
