use crate::names::{NameTable, NameTables};

/// Widest an in-game message line can be before a break is inserted.
pub const MESSAGE_WIDTH: usize = 36;

// Names resolve to their numeric id when the table knows them; unknown
// tokens pass through verbatim so hand-written ids keep working.
fn resolve(table: &NameTable, token: &str) -> String {
    match table.lookup(token) {
        Some(id) => id.to_string(),
        None => token.to_string(),
    }
}

pub fn give_item(tables: &NameTables, item: &str, quantity: &str) -> String {
    let item_id = resolve(&tables.items, item);
    format!(
        "#org @give\n\
         giveitem {} {} MSG_NORMAL\n\
         msgbox @msg MSG_KEEPOPEN\n\
         callstd MSG_NORMAL\n\
         release\n\
         end\n\n\
         #org @msg\n= Received an item!\n",
        item_id, quantity
    )
}

pub fn wild_encounter(
    tables: &NameTables,
    species: &str,
    level: &str,
    item: &str,
    flag: &str,
) -> String {
    let species_id = resolve(&tables.species, species);
    let item_id = resolve(&tables.items, item);
    let flag_id = resolve(&tables.flags, flag);
    format!(
        "#dyn 0x740000\n\
         #org @start\n\
         special 0x187\n\
         compare LASTRESULT 2\n\
         if == jump 0x81A7AE0\n\
         special 0x188\n\
         lock\n\
         faceplayer\n\
         checksound\n\
         cry {species} 2\n\
         waitcry\n\
         pause 0x14\n\
         playsound 0x156 0x0\n\
         battle {species} 0x{level} {item}\n\
         setflag {flag}\n\
         special 0x138\n\
         waitspecial\n\
         clearflag {flag}\n\
         special2 0x800D 0xB4\n\
         compare LASTRESULT 1\n\
         if == jump 0x8162558\n\
         compare LASTRESULT 4\n\
         if == jump 0x8162561\n\
         compare LASTRESULT 5\n\
         if == jump 0x8162561\n\
         setflag 0x581\n\
         release\n\
         end\n",
        species = species_id,
        level = level,
        item = item_id,
        flag = flag_id,
    )
}

pub fn person_talking() -> String {
    "#org @talk\n\
     lock\n\
     faceplayer\n\
     msgbox @msg MSG_NORMAL\n\
     callstd MSG_NORMAL\n\
     release\n\
     end\n\n\
     #org @msg\n= Hello there, trainer!\n"
        .to_string()
}

pub fn road_closed() -> String {
    "#org @blocker\n\
     lock\n\
     faceplayer\n\
     msgbox @msg MSG_NORMAL\n\
     callstd MSG_NORMAL\n\
     release\n\
     end\n\n\
     #org @msg\n= You can't go this way yet.\n"
        .to_string()
}

pub fn find_item() -> String {
    "#org @find\n\
     fanfare 0x13E\n\
     msgbox @msg MSG_KEEPOPEN\n\
     giveitem ITEM_ID QUANTITY MSG_FIND\n\
     waitfanfare\n\
     release\n\
     end\n\n\
     #org @msg\n= You found an item!\n"
        .to_string()
}

/// Wraps the message part of `= `-lines at [`MESSAGE_WIDTH`] columns,
/// alternating `\n` and `\p` break codes. Lines that already contain a
/// break code pass through untouched, as do non-message lines.
pub fn wrap_message(text: &str) -> String {
    let mut result = Vec::new();

    for line in text.lines() {
        let Some(idx) = line.find("= ") else {
            result.push(line.to_string());
            continue;
        };
        let (pre, msg) = line.split_at(idx);
        let raw = msg[2..].trim();
        if raw.contains("\\n") || raw.contains("\\p") {
            result.push(line.to_string());
            continue;
        }

        let mut wrapped = String::new();
        let mut current = String::new();
        let mut count = 0usize;
        for word in raw.split_whitespace() {
            if current.len() + word.len() + 1 > MESSAGE_WIDTH {
                wrapped.push_str(current.trim_end());
                wrapped.push_str(if count % 2 == 1 { "\\p" } else { "\\n" });
                current.clear();
                count += 1;
            }
            current.push_str(word);
            current.push(' ');
        }
        wrapped.push_str(current.trim_end());
        result.push(format!("{}= {}", pre, wrapped));
    }

    result.join("\n")
}
