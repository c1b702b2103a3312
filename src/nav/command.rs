use std::time::Duration;

/// Commands represent deferred work the navigator wants scheduled.
/// They are returned from `Navigator::update()` and executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<Msg> {
    /// Do nothing
    None,

    /// Execute multiple commands in sequence
    Batch(Vec<Command<Msg>>),

    /// Deliver a message at the next rendering frame
    NextFrame(Msg),

    /// Deliver a message once the given delay has elapsed
    Delay { after: Duration, msg: Msg },

    /// Deliver a message when web fonts have finished loading.
    /// Dropped when the environment has no such signal.
    WhenFontsReady(Msg),
}

impl<Msg> Command<Msg> {
    /// Helper to defer a message to the next frame
    pub fn next_frame(msg: Msg) -> Self {
        Command::NextFrame(msg)
    }

    /// Helper to create a timer command
    pub fn delay(after: Duration, msg: Msg) -> Self {
        Command::Delay { after, msg }
    }

    /// Helper to wait for the fonts-ready signal
    pub fn when_fonts_ready(msg: Msg) -> Self {
        Command::WhenFontsReady(msg)
    }

    /// Helper to batch multiple commands, flattening empty entries
    pub fn batch(commands: Vec<Command<Msg>>) -> Self {
        let mut commands: Vec<Command<Msg>> = commands
            .into_iter()
            .filter(|c| !matches!(c, Command::None))
            .collect();

        match commands.len() {
            0 => Command::None,
            1 => commands.remove(0),
            _ => Command::Batch(commands),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }

    /// Flatten nested batches into a list of leaf commands, in order
    pub fn into_leaves(self) -> Vec<Command<Msg>> {
        match self {
            Command::None => Vec::new(),
            Command::Batch(commands) => commands
                .into_iter()
                .flat_map(Command::into_leaves)
                .collect(),
            leaf => vec![leaf],
        }
    }
}

impl<Msg> Default for Command<Msg> {
    fn default() -> Self {
        Command::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_collapses_trivial_cases() {
        let empty: Command<u8> = Command::batch(vec![Command::None, Command::None]);
        assert!(empty.is_none());

        let single = Command::batch(vec![Command::None, Command::next_frame(1u8)]);
        assert_eq!(single, Command::NextFrame(1));
    }

    #[test]
    fn test_into_leaves_preserves_order() {
        let cmd = Command::batch(vec![
            Command::next_frame(1u8),
            Command::batch(vec![
                Command::delay(Duration::from_millis(5), 2),
                Command::when_fonts_ready(3),
            ]),
        ]);

        let leaves = cmd.into_leaves();
        assert_eq!(
            leaves,
            vec![
                Command::NextFrame(1),
                Command::Delay { after: Duration::from_millis(5), msg: 2 },
                Command::WhenFontsReady(3),
            ]
        );
    }
}
