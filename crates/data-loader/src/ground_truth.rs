//! Historical Best Picture nominees.
//!
//! The fixed, versioned list every run starts from: one entry per nominee as
//! `(ceremony_year, title, won)`. Ceremony year is the year the Oscars were
//! held, so `2024` is the 96th Academy Awards honoring films from 2023.

use crate::types::{CeremonyYear, NomineeRecord};

/// Version of the list below; bump when entries are added or corrected
pub const GROUND_TRUTH_VERSION: u32 = 1;

pub const OSCAR_BEST_PICTURE: &[(CeremonyYear, &str, bool)] = &[
    // 2025
    (2025, "Anora", true),
    (2025, "The Brutalist", false),
    (2025, "A Complete Unknown", false),
    (2025, "Conclave", false),
    (2025, "Dune: Part Two", false),
    (2025, "Emilia Pérez", false),
    (2025, "I'm Still Here", false),
    (2025, "Nickel Boys", false),
    (2025, "The Substance", false),
    (2025, "Wicked", false),

    // 2024
    (2024, "Oppenheimer", true),
    (2024, "American Fiction", false),
    (2024, "Anatomy of a Fall", false),
    (2024, "Barbie", false),
    (2024, "The Holdovers", false),
    (2024, "Killers of the Flower Moon", false),
    (2024, "Maestro", false),
    (2024, "Past Lives", false),
    (2024, "Poor Things", false),
    (2024, "Zone of Interest", false),

    // 2023
    (2023, "Everything Everywhere All at Once", true),
    (2023, "All Quiet on the Western Front", false),
    (2023, "The Banshees of Inisherin", false),
    (2023, "Elvis", false),
    (2023, "The Fabelmans", false),
    (2023, "Tár", false),
    (2023, "Top Gun: Maverick", false),
    (2023, "Triangle of Sadness", false),
    (2023, "Women Talking", false),

    // 2022
    (2022, "CODA", true),
    (2022, "Belfast", false),
    (2022, "Don't Look Up", false),
    (2022, "Drive My Car", false),
    (2022, "Dune", false),
    (2022, "King Richard", false),
    (2022, "Licorice Pizza", false),
    (2022, "Nightmare Alley", false),
    (2022, "The Power of the Dog", false),
    (2022, "West Side Story", false),

    // 2021
    (2021, "Nomadland", true),
    (2021, "The Father", false),
    (2021, "Judas and the Black Messiah", false),
    (2021, "Mank", false),
    (2021, "Minari", false),
    (2021, "Promising Young Woman", false),
    (2021, "Sound of Metal", false),
    (2021, "The Trial of the Chicago 7", false),

    // 2020
    (2020, "Parasite", true),
    (2020, "Ford v Ferrari", false),
    (2020, "The Irishman", false),
    (2020, "Jojo Rabbit", false),
    (2020, "Joker", false),
    (2020, "Little Women", false),
    (2020, "Marriage Story", false),
    (2020, "1917", false),
    (2020, "Once Upon a Time in Hollywood", false),

    // 2019
    (2019, "Green Book", true),
    (2019, "Black Panther", false),
    (2019, "BlacKkKlansman", false),
    (2019, "Bohemian Rhapsody", false),
    (2019, "The Favourite", false),
    (2019, "Roma", false),
    (2019, "A Star Is Born", false),
    (2019, "Vice", false),

    // 2018
    (2018, "The Shape of Water", true),
    (2018, "Call Me by Your Name", false),
    (2018, "Darkest Hour", false),
    (2018, "Dunkirk", false),
    (2018, "Get Out", false),
    (2018, "Lady Bird", false),
    (2018, "Phantom Thread", false),
    (2018, "The Post", false),
    (2018, "Three Billboards Outside Ebbing, Missouri", false),

    // 2017
    (2017, "Moonlight", true),
    (2017, "Arrival", false),
    (2017, "Fences", false),
    (2017, "Hacksaw Ridge", false),
    (2017, "Hell or High Water", false),
    (2017, "Hidden Figures", false),
    (2017, "La La Land", false),
    (2017, "Lion", false),
    (2017, "Manchester by the Sea", false),

    // 2016
    (2016, "Spotlight", true),
    (2016, "The Big Short", false),
    (2016, "Bridge of Spies", false),
    (2016, "Brooklyn", false),
    (2016, "Mad Max: Fury Road", false),
    (2016, "The Martian", false),
    (2016, "The Revenant", false),
    (2016, "Room", false),

    // 2015
    (2015, "Birdman", true),
    (2015, "American Sniper", false),
    (2015, "Boyhood", false),
    (2015, "The Grand Budapest Hotel", false),
    (2015, "The Imitation Game", false),
    (2015, "Selma", false),
    (2015, "The Theory of Everything", false),
    (2015, "Whiplash", false),

    // 2014
    (2014, "12 Years a Slave", true),
    (2014, "American Hustle", false),
    (2014, "Captain Phillips", false),
    (2014, "Dallas Buyers Club", false),
    (2014, "Gravity", false),
    (2014, "Her", false),
    (2014, "Nebraska", false),
    (2014, "Philomena", false),
    (2014, "The Wolf of Wall Street", false),

    // 2013
    (2013, "Argo", true),
    (2013, "Amour", false),
    (2013, "Beasts of the Southern Wild", false),
    (2013, "Django Unchained", false),
    (2013, "Les Misérables", false),
    (2013, "Life of Pi", false),
    (2013, "Lincoln", false),
    (2013, "Silver Linings Playbook", false),
    (2013, "Zero Dark Thirty", false),

    // 2012
    (2012, "The Artist", true),
    (2012, "The Descendants", false),
    (2012, "Extremely Loud & Incredibly Close", false),
    (2012, "The Help", false),
    (2012, "Hugo", false),
    (2012, "Midnight in Paris", false),
    (2012, "Moneyball", false),
    (2012, "The Tree of Life", false),
    (2012, "War Horse", false),

    // 2011
    (2011, "The King's Speech", true),
    (2011, "Black Swan", false),
    (2011, "The Fighter", false),
    (2011, "Inception", false),
    (2011, "The Kids Are All Right", false),
    (2011, "127 Hours", false),
    (2011, "The Social Network", false),
    (2011, "Toy Story 3", false),
    (2011, "True Grit", false),
    (2011, "Winter's Bone", false),

    // 2010
    (2010, "The Hurt Locker", true),
    (2010, "Avatar", false),
    (2010, "The Blind Side", false),
    (2010, "District 9", false),
    (2010, "An Education", false),
    (2010, "Inglourious Basterds", false),
    (2010, "Precious", false),
    (2010, "A Serious Man", false),
    (2010, "Up", false),
    (2010, "Up in the Air", false),

    // 2009
    (2009, "Slumdog Millionaire", true),
    (2009, "The Curious Case of Benjamin Button", false),
    (2009, "Frost/Nixon", false),
    (2009, "Milk", false),
    (2009, "The Reader", false),

    // 2008
    (2008, "No Country for Old Men", true),
    (2008, "Atonement", false),
    (2008, "Juno", false),
    (2008, "Michael Clayton", false),
    (2008, "There Will Be Blood", false),

    // 2007
    (2007, "The Departed", true),
    (2007, "Babel", false),
    (2007, "Letters from Iwo Jima", false),
    (2007, "Little Miss Sunshine", false),
    (2007, "The Queen", false),

    // 2006
    (2006, "Crash", true),
    (2006, "Brokeback Mountain", false),
    (2006, "Capote", false),
    (2006, "Good Night, and Good Luck", false),
    (2006, "Munich", false),

    // 2005
    (2005, "Million Dollar Baby", true),
    (2005, "The Aviator", false),
    (2005, "Finding Neverland", false),
    (2005, "Ray", false),
    (2005, "Sideways", false),
];

/// Nominee titles for one ceremony, in list order.
pub fn nominees_for_year(year: CeremonyYear) -> Vec<&'static str> {
    OSCAR_BEST_PICTURE
        .iter()
        .filter(|(y, _, _)| *y == year)
        .map(|(_, title, _)| *title)
        .collect()
}

/// The winning title for one ceremony, if the list covers it.
pub fn winner_for_year(year: CeremonyYear) -> Option<&'static str> {
    OSCAR_BEST_PICTURE
        .iter()
        .find(|(y, _, won)| *y == year && *won)
        .map(|(_, title, _)| *title)
}

/// Distinct ceremony years covered, ascending.
pub fn ceremony_years() -> Vec<CeremonyYear> {
    let mut years: Vec<CeremonyYear> = OSCAR_BEST_PICTURE.iter().map(|(y, _, _)| *y).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// The whole list as metadata-free nominee rows.
pub fn bare_nominees() -> Vec<NomineeRecord> {
    OSCAR_BEST_PICTURE
        .iter()
        .map(|&(year, title, won)| NomineeRecord::bare(year, title, won))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_one_winner_per_ceremony() {
        for year in ceremony_years() {
            let winners = OSCAR_BEST_PICTURE
                .iter()
                .filter(|(y, _, won)| *y == year && *won)
                .count();
            assert_eq!(winners, 1, "ceremony {} should have exactly one winner", year);
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = OSCAR_BEST_PICTURE.iter().map(|(y, t, _)| (*y, *t)).collect();
        assert_eq!(keys.len(), OSCAR_BEST_PICTURE.len());
    }

    #[test]
    fn test_lookups() {
        assert_eq!(winner_for_year(2021), Some("Nomadland"));
        assert_eq!(winner_for_year(1950), None);
        assert!(nominees_for_year(2020).contains(&"Parasite"));
        assert_eq!(nominees_for_year(2021).len(), 8);
        assert_eq!(bare_nominees().len(), OSCAR_BEST_PICTURE.len());
    }
}
