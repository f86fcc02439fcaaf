use torneo_bracket::Stage;
use tui::style::{Color, Modifier, Style};

pub const FRAME_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerColor {
    Primary,
    Secondary,
    Accent,
    Shadow,
    Dim,
    Winner,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BannerTheme {
    #[default]
    Dark,
}

pub fn resolve(color: BannerColor, _theme: BannerTheme) -> Style {
    match color {
        BannerColor::Primary => Style::default().fg(Color::Rgb(212, 175, 55)),
        BannerColor::Secondary => Style::default().fg(Color::Rgb(0, 153, 76)),
        BannerColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        BannerColor::Shadow | BannerColor::Dim => Style::default().fg(Color::Indexed(240)),
        BannerColor::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    }
}

/// Triangle wave over `0..height`, one step per tick — drives the shimmer
/// highlight down and back up the trophy.
pub fn shimmer_row(tick: u64, height: u16) -> u16 {
    if height == 0 {
        return 0;
    }
    let h = u64::from(height.saturating_sub(1));
    if h == 0 {
        return 0;
    }
    let period = 2 * h;
    let t = tick % period;
    (h.abs_diff(t)) as u16
}

pub fn trophy_frame(frame: usize) -> [&'static str; 5] {
    const FRAMES: [[&str; 5]; FRAME_COUNT] = [
        ["  .___.  ", " (     ) ", "  \\___/  ", "    |    ", "  __|__  "],
        ["  .___.  ", " (  *  ) ", "  \\___/  ", "    |    ", "  __|__  "],
        ["  .___.  ", " (     ) ", "  \\_*_/  ", "    |    ", "  __|__  "],
        ["  .___.  ", " ( .   ) ", "  \\___/  ", "    |    ", "  __|__  "],
    ];
    FRAMES[frame % FRAME_COUNT]
}

pub fn title_rows() -> [&'static str; 4] {
    [
        " _____   ___   ___  _  _  ___   ___  ",
        "|_   _| / _ \\ | _ \\| \\| || __| / _ \\ ",
        "  | |  | (_) ||   /| .` || _| | (_) |",
        "  |_|   \\___/ |_|_\\|_|\\_||___| \\___/ ",
    ]
}

pub fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::RoundOf32 => "ROUND OF 32",
        Stage::RoundOf16 => "ROUND OF 16",
        Stage::Quarterfinals => "QUARTERFINALS",
        Stage::Semifinal => "SEMIFINAL",
        Stage::Finalist => "FINALIST",
    }
}
