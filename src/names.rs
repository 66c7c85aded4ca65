use std::collections::HashMap;
use std::path::Path;

/// A `name -> id` table loaded from a `.dat` file: one name per line, the
/// 1-based line number is the id. Lookups are plain key lookups; callers
/// fall back to the raw token themselves when a name is absent, so the
/// fallback stays visible at the use site.
#[derive(Debug, Default, Clone)]
pub struct NameTable {
    entries: HashMap<String, u16>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing or unreadable files yield an empty table, not an error; the
    /// tables are optional data packs.
    pub fn load(path: &Path) -> Self {
        let mut entries = HashMap::new();
        if let Ok(content) = std::fs::read_to_string(path) {
            for (index, line) in content.lines().enumerate() {
                let name = line.trim();
                if !name.is_empty() {
                    entries.insert(name.to_string(), (index + 1) as u16);
                }
            }
        }
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<u16> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The three data packs the script snippets draw from.
#[derive(Debug, Default, Clone)]
pub struct NameTables {
    pub species: NameTable,
    pub items: NameTable,
    pub flags: NameTable,
}

impl NameTables {
    pub fn load_from(dir: &Path) -> Self {
        Self {
            species: NameTable::load(&dir.join("species.dat")),
            items: NameTable::load(&dir.join("items.dat")),
            flags: NameTable::load(&dir.join("flags.dat")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_lookup() {
        let mut path = std::env::temp_dir();
        path.push("freespacer_species.dat");
        std::fs::write(&path, "BULBASAUR\nIVYSAUR\n\nVENUSAUR\n").unwrap();

        let table = NameTable::load(&path);
        assert_eq!(table.lookup("BULBASAUR"), Some(1));
        assert_eq!(table.lookup("IVYSAUR"), Some(2));
        // Blank lines keep their line number
        assert_eq!(table.lookup("VENUSAUR"), Some(4));
        assert_eq!(table.lookup("MISSINGNO"), None);
        assert_eq!(table.len(), 3);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let table = NameTable::load(Path::new("definitely_not_here.dat"));
        assert!(table.is_empty());
    }
}
