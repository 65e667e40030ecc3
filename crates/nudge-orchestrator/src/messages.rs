//! Notification texts, rendered as Telegram HTML.

use nudge_agent::ProjectIdea;
use nudge_core::TimeBand;

/// Escapes text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Celebration for a day that already has a commit.
pub fn celebration(band: TimeBand, streak: Option<u32>) -> String {
    let tail = match band {
        TimeBand::Morning => "🌅 Early start, the day is already counted.",
        TimeBand::Afternoon => "☀️ You're on track today.",
        TimeBand::Evening => "🌙 Streak maintained!",
    };
    let mut message = format!("✅ <b>Great job! Commit detected today.</b>\n\n{}", tail);
    if let Some(days) = streak.filter(|d| *d > 0) {
        message.push_str(&format!("\n🔥 Current streak: {}", plural_days(days)));
    }
    message
}

/// Soft or strong nudge for the morning and afternoon runs.
pub fn nudge(band: TimeBand) -> String {
    match band {
        TimeBand::Morning => "🌅 <b>Good morning!</b>\n\nNo commit yet today. \
            A small one is enough to keep the streak going. ☕"
            .to_string(),
        TimeBand::Afternoon => "⏰ <b>Reminder: still no commit today!</b>\n\n\
            Half the day is gone. Push something before the evening check. 💪"
            .to_string(),
        TimeBand::Evening => "⏰ <b>Reminder: commit today!</b>".to_string(),
    }
}

/// Evening reminder carrying a project idea.
pub fn reminder(idea: &ProjectIdea) -> String {
    format!(
        "🚨 <b>Reminder: Commit Today!</b> 🚨\n\n\
         You haven't committed yet today. Here's a project idea tailored for you:\n\n\
         {}\n\n\
         Let's keep that streak alive! 💪",
        idea_block(idea)
    )
}

/// On-demand suggestion reply.
pub fn suggestion(idea: &ProjectIdea) -> String {
    format!(
        "💡 <b>AI-Generated Project Idea</b>\n\n{}\n\nReady to build? Let's code! 🚀",
        idea_block(idea)
    )
}

fn idea_block(idea: &ProjectIdea) -> String {
    format!(
        "<b>{}</b>\n{}\n\n<b>Tech Stack:</b> {}\n<b>Difficulty:</b> {}",
        escape_html(&idea.title),
        escape_html(&idea.description),
        escape_html(&idea.tech_stack),
        idea.difficulty
    )
}

pub fn plural_days(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudge_agent::Difficulty;

    fn idea() -> ProjectIdea {
        ProjectIdea {
            title: "Diff <Viewer>".into(),
            description: "Compare A & B.".into(),
            tech_stack: "Rust".into(),
            difficulty: Difficulty::Hard,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > \"d\""), "a &lt; b &amp;&amp; c &gt; &quot;d&quot;");
    }

    #[test]
    fn test_celebration_mentions_detection_in_every_band() {
        for band in [TimeBand::Morning, TimeBand::Afternoon, TimeBand::Evening] {
            assert!(celebration(band, None).contains("Great job! Commit detected"));
        }
        assert!(celebration(TimeBand::Evening, Some(3)).contains("3 days"));
        assert!(!celebration(TimeBand::Evening, Some(0)).contains("streak:"));
    }

    #[test]
    fn test_reminder_escapes_idea_fields() {
        let text = reminder(&idea());
        assert!(text.contains("<b>Diff &lt;Viewer&gt;</b>"));
        assert!(text.contains("Compare A &amp; B."));
        assert!(text.contains("<b>Difficulty:</b> Hard"));
    }

    #[test]
    fn test_nudges_differ_by_band() {
        assert_ne!(nudge(TimeBand::Morning), nudge(TimeBand::Afternoon));
    }

    #[test]
    fn test_plural_days() {
        assert_eq!(plural_days(1), "1 day");
        assert_eq!(plural_days(4), "4 days");
    }
}
