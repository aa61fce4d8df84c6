//! Choosing which duplicates are actually removed.
//!
//! [`AutoSelect`] removes every group member except its survivor.
//! [`PromptSelect`] asks, group by group, on any reader/writer pair.

use std::io::{self, BufRead, Write};

use crate::duplicates::{aggregate_removal_ids, Comparator, DuplicateGroup, RemovalSet};

/// Policy deciding the removal set from discovered groups.
pub trait SelectionPolicy {
    /// Compute the ids to remove.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if an interactive policy cannot talk to the user.
    fn select(&mut self, groups: &[DuplicateGroup]) -> io::Result<RemovalSet>;
}

/// Remove every member except the survivor of each group.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSelect;

impl SelectionPolicy for AutoSelect {
    fn select(&mut self, groups: &[DuplicateGroup]) -> io::Result<RemovalSet> {
        Ok(aggregate_removal_ids(groups))
    }
}

/// Answer to a prompt for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer {
    /// Remove all members except the survivor.
    Default,
    /// Keep every member.
    Skip,
    /// Remove the members at these 0-based positions.
    Pick(Vec<usize>),
    /// Stop asking.
    Quit,
}

fn parse_answer(line: &str, group_len: usize) -> Option<Answer> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => return Some(Answer::Default),
        "n" | "no" | "s" | "skip" => return Some(Answer::Skip),
        "q" | "quit" => return Some(Answer::Quit),
        _ => {}
    }

    let mut picks = Vec::new();
    for token in line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let index: usize = token.parse().ok()?;
        if index == 0 || index > group_len {
            return None;
        }
        if !picks.contains(&(index - 1)) {
            picks.push(index - 1);
        }
    }

    if picks.is_empty() || picks.len() >= group_len {
        return None;
    }
    Some(Answer::Pick(picks))
}

/// Interactive selection over a line-oriented reader and writer.
///
/// For each group the members are listed (survivor first) and one line is
/// read:
///
/// - empty, `y` - remove every member except the survivor
/// - `n`, `s` - keep the whole group
/// - `1,3` or `1 3` - remove exactly those members; at least one must remain
/// - `q` - stop, keeping the choices made so far
///
/// Anything else prints a hint and asks again. End of input behaves like `q`.
pub struct PromptSelect<R, W> {
    input: R,
    output: W,
    comparator: Comparator,
}

impl<R: BufRead, W: Write> PromptSelect<R, W> {
    /// Create a prompt reading answers from `input` and writing to `output`.
    pub fn new(input: R, output: W, comparator: Comparator) -> Self {
        Self {
            input,
            output,
            comparator,
        }
    }

    fn show(&mut self, index: usize, total: usize, group: &DuplicateGroup) -> io::Result<()> {
        writeln!(
            self.output,
            "Group {}/{} in \"{}\":",
            index + 1,
            total,
            group.folder_name.as_deref().unwrap_or(&group.folder_id)
        )?;
        for (position, member) in group.members.iter().enumerate() {
            let role = if position == 0 { "keep" } else { "dup " };
            writeln!(
                self.output,
                "  {:>2}. [{}] {} ({}) id={}",
                position + 1,
                role,
                member.display_name(),
                self.comparator.payload(member).unwrap_or_default(),
                member.id
            )?;
        }
        write!(
            self.output,
            "Remove duplicates? [Y]es / [n]o / numbers / [q]uit: "
        )?;
        self.output.flush()
    }

    fn ask(&mut self, index: usize, total: usize, group: &DuplicateGroup) -> io::Result<Answer> {
        self.show(index, total, group)?;
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Answer::Quit);
            }
            if let Some(answer) = parse_answer(&line, group.len()) {
                return Ok(answer);
            }
            write!(
                self.output,
                "Enter y, n, q or member numbers (1-{}), leaving at least one: ",
                group.len()
            )?;
            self.output.flush()?;
        }
    }
}

impl<R: BufRead, W: Write> SelectionPolicy for PromptSelect<R, W> {
    fn select(&mut self, groups: &[DuplicateGroup]) -> io::Result<RemovalSet> {
        let mut selected = RemovalSet::new();
        let survivors: RemovalSet = groups
            .iter()
            .filter_map(|group| group.survivor())
            .map(|node| node.id.clone())
            .collect();

        for (index, group) in groups.iter().enumerate() {
            match self.ask(index, groups.len(), group)? {
                Answer::Default => {
                    selected.extend(
                        aggregate_removal_ids(std::slice::from_ref(group))
                            .into_iter()
                            .filter(|id| !survivors.contains(id)),
                    );
                }
                Answer::Skip => {
                    log::debug!("Keeping all {} members of group {}", group.len(), index + 1);
                }
                Answer::Pick(positions) => {
                    selected.extend(positions.into_iter().map(|p| group.members[p].id.clone()));
                }
                Answer::Quit => {
                    log::info!("Selection stopped after {} of {} groups", index, groups.len());
                    break;
                }
            }
        }

        Ok(selected)
    }
}
