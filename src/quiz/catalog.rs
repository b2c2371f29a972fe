//! Static country reference data
//!
//! Every quiz item is an ISO 3166-1 alpha-2 code. The catalog resolves codes to
//! continents (and capitals for Capital mode) and hands out per-tier pools.

use serde::{Deserialize, Serialize};

/// Column targets, in fixed board order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Continent {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
    /// Unresolved code; never distributed onto the board
    Unknown,
}

impl Continent {
    /// The five board continents, left to right
    pub const BOARD: [Continent; 5] = [
        Continent::Africa,
        Continent::Americas,
        Continent::Asia,
        Continent::Europe,
        Continent::Oceania,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Americas => "Americas",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::Oceania => "Oceania",
            Continent::Unknown => "Unknown",
        }
    }

    /// Board column for this continent (`None` for Unknown)
    pub fn column(&self) -> Option<usize> {
        Self::BOARD.iter().position(|c| c == self)
    }
}

/// A quiz item: country code plus its resolved continent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Country {
    pub code: &'static str,
    pub continent: Continent,
}

/// Full reference record for one country
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub capital: &'static str,
    pub continent: Continent,
    /// Continent of the capital city when it differs from the country's
    pub capital_continent: Option<Continent>,
    /// Difficulty tier, 1 (well known) to 3 (obscure)
    pub tier: u8,
}

impl CatalogEntry {
    pub fn country(&self) -> Country {
        Country {
            code: self.code,
            continent: self.continent,
        }
    }

    pub fn capital_continent(&self) -> Continent {
        self.capital_continent.unwrap_or(self.continent)
    }
}

/// Lookup table over [`CatalogEntry`] records
#[derive(Debug, Clone)]
pub struct CountryCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for CountryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CountryCatalog {
    /// The shipped world catalog
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(
                    |&(code, name, capital, continent, capital_continent, tier)| CatalogEntry {
                        code,
                        name,
                        capital,
                        continent,
                        capital_continent,
                        tier,
                    },
                )
                .collect(),
        }
    }

    /// Build a catalog from custom entries. Entries with an Unknown country
    /// or capital continent and duplicate codes are dropped; an empty result
    /// falls back to the builtin table so generation always has material.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut kept: Vec<CatalogEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.continent == Continent::Unknown {
                log::debug!("Catalog: dropping {} (no continent)", entry.code);
                continue;
            }
            if entry.capital_continent == Some(Continent::Unknown) {
                log::debug!("Catalog: dropping {} (no capital continent)", entry.code);
                continue;
            }
            if kept.iter().any(|e| e.code == entry.code) {
                continue;
            }
            kept.push(entry);
        }
        if kept.is_empty() {
            log::warn!("Catalog: no usable entries, using builtin table");
            return Self::builtin();
        }
        Self { entries: kept }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.code.eq_ignore_ascii_case(code))
    }

    /// Continent for a code, `Unknown` when the code is not in the table
    pub fn continent_of(&self, code: &str) -> Continent {
        self.entry(code).map(|e| e.continent).unwrap_or(Continent::Unknown)
    }

    /// Resolve a level-table code. Unresolved codes keep the caller's string
    /// and come back as `Unknown`.
    pub fn resolve(&self, code: &'static str) -> Country {
        match self.entry(code) {
            Some(entry) => entry.country(),
            None => Country {
                code,
                continent: Continent::Unknown,
            },
        }
    }

    /// All countries on one continent, in table order
    pub fn by_continent(&self, continent: Continent) -> impl Iterator<Item = Country> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.continent == continent)
            .map(CatalogEntry::country)
    }

    /// Countries whose tier is at most `max_tier`
    pub fn tier_pool(&self, max_tier: u8) -> Vec<Country> {
        self.entries
            .iter()
            .filter(|e| e.tier <= max_tier)
            .map(CatalogEntry::country)
            .collect()
    }

    /// Countries of exactly one tier
    pub fn tier_only(&self, tier: u8) -> Vec<Country> {
        self.entries
            .iter()
            .filter(|e| e.tier == tier)
            .map(CatalogEntry::country)
            .collect()
    }

    pub fn countries(&self) -> impl Iterator<Item = Country> + '_ {
        self.entries.iter().map(CatalogEntry::country)
    }
}

use Continent::{Africa as AF, Americas as AM, Asia as AS, Europe as EU, Oceania as OC};

type Row = (&'static str, &'static str, &'static str, Continent, Option<Continent>, u8);

#[rustfmt::skip]
const BUILTIN: &[Row] = &[
    // Africa
    ("EG", "Egypt", "Cairo", AF, None, 1),
    ("NG", "Nigeria", "Abuja", AF, None, 1),
    ("ZA", "South Africa", "Pretoria", AF, None, 1),
    ("KE", "Kenya", "Nairobi", AF, None, 1),
    ("MA", "Morocco", "Rabat", AF, None, 1),
    ("ET", "Ethiopia", "Addis Ababa", AF, None, 1),
    ("GH", "Ghana", "Accra", AF, None, 1),
    ("DZ", "Algeria", "Algiers", AF, None, 2),
    ("TN", "Tunisia", "Tunis", AF, None, 2),
    ("SN", "Senegal", "Dakar", AF, None, 2),
    ("CM", "Cameroon", "Yaoundé", AF, None, 2),
    ("TZ", "Tanzania", "Dodoma", AF, None, 2),
    ("UG", "Uganda", "Kampala", AF, None, 2),
    ("AO", "Angola", "Luanda", AF, None, 2),
    ("CI", "Côte d'Ivoire", "Yamoussoukro", AF, None, 2),
    ("ZW", "Zimbabwe", "Harare", AF, None, 2),
    ("MG", "Madagascar", "Antananarivo", AF, None, 2),
    ("LY", "Libya", "Tripoli", AF, None, 2),
    ("SD", "Sudan", "Khartoum", AF, None, 2),
    ("RW", "Rwanda", "Kigali", AF, None, 3),
    ("ML", "Mali", "Bamako", AF, None, 3),
    ("NE", "Niger", "Niamey", AF, None, 3),
    ("BF", "Burkina Faso", "Ouagadougou", AF, None, 3),
    ("BW", "Botswana", "Gaborone", AF, None, 3),
    ("NA", "Namibia", "Windhoek", AF, None, 3),
    ("MZ", "Mozambique", "Maputo", AF, None, 3),
    ("ZM", "Zambia", "Lusaka", AF, None, 3),
    ("ER", "Eritrea", "Asmara", AF, None, 3),
    ("DJ", "Djibouti", "Djibouti", AF, None, 3),
    ("GA", "Gabon", "Libreville", AF, None, 3),
    ("CV", "Cabo Verde", "Praia", AF, None, 3),
    ("MU", "Mauritius", "Port Louis", AF, None, 3),
    // Americas
    ("US", "United States", "Washington, D.C.", AM, None, 1),
    ("CA", "Canada", "Ottawa", AM, None, 1),
    ("MX", "Mexico", "Mexico City", AM, None, 1),
    ("BR", "Brazil", "Brasília", AM, None, 1),
    ("AR", "Argentina", "Buenos Aires", AM, None, 1),
    ("CL", "Chile", "Santiago", AM, None, 1),
    ("CO", "Colombia", "Bogotá", AM, None, 1),
    ("PE", "Peru", "Lima", AM, None, 1),
    ("CU", "Cuba", "Havana", AM, None, 1),
    ("JM", "Jamaica", "Kingston", AM, None, 1),
    ("VE", "Venezuela", "Caracas", AM, None, 2),
    ("EC", "Ecuador", "Quito", AM, None, 2),
    ("BO", "Bolivia", "Sucre", AM, None, 2),
    ("UY", "Uruguay", "Montevideo", AM, None, 2),
    ("PY", "Paraguay", "Asunción", AM, None, 2),
    ("PA", "Panama", "Panama City", AM, None, 2),
    ("CR", "Costa Rica", "San José", AM, None, 2),
    ("DO", "Dominican Republic", "Santo Domingo", AM, None, 2),
    ("HT", "Haiti", "Port-au-Prince", AM, None, 2),
    ("GT", "Guatemala", "Guatemala City", AM, None, 2),
    ("HN", "Honduras", "Tegucigalpa", AM, None, 3),
    ("NI", "Nicaragua", "Managua", AM, None, 3),
    ("SV", "El Salvador", "San Salvador", AM, None, 3),
    ("BZ", "Belize", "Belmopan", AM, None, 3),
    ("GY", "Guyana", "Georgetown", AM, None, 3),
    ("SR", "Suriname", "Paramaribo", AM, None, 3),
    ("TT", "Trinidad and Tobago", "Port of Spain", AM, None, 3),
    ("BS", "Bahamas", "Nassau", AM, None, 3),
    ("BB", "Barbados", "Bridgetown", AM, None, 3),
    // Asia
    ("CN", "China", "Beijing", AS, None, 1),
    ("JP", "Japan", "Tokyo", AS, None, 1),
    ("IN", "India", "New Delhi", AS, None, 1),
    ("KR", "South Korea", "Seoul", AS, None, 1),
    ("ID", "Indonesia", "Jakarta", AS, None, 1),
    ("TH", "Thailand", "Bangkok", AS, None, 1),
    ("VN", "Vietnam", "Hanoi", AS, None, 1),
    ("SA", "Saudi Arabia", "Riyadh", AS, None, 1),
    ("TR", "Turkey", "Ankara", AS, None, 1),
    ("PH", "Philippines", "Manila", AS, None, 1),
    ("RU", "Russia", "Moscow", AS, Some(EU), 1),
    ("PK", "Pakistan", "Islamabad", AS, None, 2),
    ("BD", "Bangladesh", "Dhaka", AS, None, 2),
    ("IR", "Iran", "Tehran", AS, None, 2),
    ("IQ", "Iraq", "Baghdad", AS, None, 2),
    ("MY", "Malaysia", "Kuala Lumpur", AS, None, 2),
    ("SG", "Singapore", "Singapore", AS, None, 2),
    ("NP", "Nepal", "Kathmandu", AS, None, 2),
    ("LK", "Sri Lanka", "Sri Jayawardenepura Kotte", AS, None, 2),
    ("AE", "United Arab Emirates", "Abu Dhabi", AS, None, 2),
    ("KZ", "Kazakhstan", "Astana", AS, None, 2),
    ("MN", "Mongolia", "Ulaanbaatar", AS, None, 2),
    ("AF", "Afghanistan", "Kabul", AS, None, 3),
    ("UZ", "Uzbekistan", "Tashkent", AS, None, 3),
    ("KH", "Cambodia", "Phnom Penh", AS, None, 3),
    ("LA", "Laos", "Vientiane", AS, None, 3),
    ("MM", "Myanmar", "Naypyidaw", AS, None, 3),
    ("QA", "Qatar", "Doha", AS, None, 3),
    ("JO", "Jordan", "Amman", AS, None, 3),
    ("OM", "Oman", "Muscat", AS, None, 3),
    ("BT", "Bhutan", "Thimphu", AS, None, 3),
    ("KG", "Kyrgyzstan", "Bishkek", AS, None, 3),
    ("BN", "Brunei", "Bandar Seri Begawan", AS, None, 3),
    // Europe
    ("FR", "France", "Paris", EU, None, 1),
    ("DE", "Germany", "Berlin", EU, None, 1),
    ("IT", "Italy", "Rome", EU, None, 1),
    ("ES", "Spain", "Madrid", EU, None, 1),
    ("GB", "United Kingdom", "London", EU, None, 1),
    ("PT", "Portugal", "Lisbon", EU, None, 1),
    ("NL", "Netherlands", "Amsterdam", EU, None, 1),
    ("GR", "Greece", "Athens", EU, None, 1),
    ("SE", "Sweden", "Stockholm", EU, None, 1),
    ("CH", "Switzerland", "Bern", EU, None, 1),
    ("IE", "Ireland", "Dublin", EU, None, 1),
    ("BE", "Belgium", "Brussels", EU, None, 2),
    ("AT", "Austria", "Vienna", EU, None, 2),
    ("PL", "Poland", "Warsaw", EU, None, 2),
    ("NO", "Norway", "Oslo", EU, None, 2),
    ("DK", "Denmark", "Copenhagen", EU, None, 2),
    ("FI", "Finland", "Helsinki", EU, None, 2),
    ("UA", "Ukraine", "Kyiv", EU, None, 2),
    ("CZ", "Czechia", "Prague", EU, None, 2),
    ("HU", "Hungary", "Budapest", EU, None, 2),
    ("RO", "Romania", "Bucharest", EU, None, 2),
    ("HR", "Croatia", "Zagreb", EU, None, 2),
    ("IS", "Iceland", "Reykjavík", EU, None, 2),
    ("RS", "Serbia", "Belgrade", EU, None, 3),
    ("BG", "Bulgaria", "Sofia", EU, None, 3),
    ("SK", "Slovakia", "Bratislava", EU, None, 3),
    ("SI", "Slovenia", "Ljubljana", EU, None, 3),
    ("EE", "Estonia", "Tallinn", EU, None, 3),
    ("LV", "Latvia", "Riga", EU, None, 3),
    ("LT", "Lithuania", "Vilnius", EU, None, 3),
    ("BY", "Belarus", "Minsk", EU, None, 3),
    ("MD", "Moldova", "Chișinău", EU, None, 3),
    ("AL", "Albania", "Tirana", EU, None, 3),
    ("MK", "North Macedonia", "Skopje", EU, None, 3),
    ("BA", "Bosnia and Herzegovina", "Sarajevo", EU, None, 3),
    ("ME", "Montenegro", "Podgorica", EU, None, 3),
    ("LU", "Luxembourg", "Luxembourg", EU, None, 3),
    ("MT", "Malta", "Valletta", EU, None, 3),
    ("AD", "Andorra", "Andorra la Vella", EU, None, 3),
    ("MC", "Monaco", "Monaco", EU, None, 3),
    ("LI", "Liechtenstein", "Vaduz", EU, None, 3),
    ("SM", "San Marino", "San Marino", EU, None, 3),
    // Oceania
    ("AU", "Australia", "Canberra", OC, None, 1),
    ("NZ", "New Zealand", "Wellington", OC, None, 1),
    ("FJ", "Fiji", "Suva", OC, None, 1),
    ("PG", "Papua New Guinea", "Port Moresby", OC, None, 1),
    ("WS", "Samoa", "Apia", OC, None, 2),
    ("TO", "Tonga", "Nukuʻalofa", OC, None, 2),
    ("VU", "Vanuatu", "Port Vila", OC, None, 2),
    ("SB", "Solomon Islands", "Honiara", OC, None, 2),
    ("KI", "Kiribati", "Tarawa", OC, None, 3),
    ("FM", "Micronesia", "Palikir", OC, None, 3),
    ("MH", "Marshall Islands", "Majuro", OC, None, 3),
    ("NR", "Nauru", "Yaren", OC, None, 3),
    ("PW", "Palau", "Ngerulmud", OC, None, 3),
    ("TV", "Tuvalu", "Funafuti", OC, None, 3),
];
