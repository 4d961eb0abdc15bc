#[derive(Clone, Copy, Debug)]
pub struct Glyphs {
    pub cursor: &'static str,
    pub h_separator: &'static str,
    pub arrow_left: &'static str,
    pub arrow_right: &'static str,
    pub loading: &'static str,
}

pub fn select(fancy_requested: bool) -> Glyphs {
    if fancy_requested {
        fancy()
    } else {
        ascii()
    }
}

fn ascii() -> Glyphs {
    Glyphs {
        cursor: ">",
        h_separator: "-",
        arrow_left: "<",
        arrow_right: ">",
        loading: "...",
    }
}

fn fancy() -> Glyphs {
    Glyphs {
        cursor: "▶",
        h_separator: "─",
        arrow_left: "←",
        arrow_right: "→",
        loading: "⟳",
    }
}
