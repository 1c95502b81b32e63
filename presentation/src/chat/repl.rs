//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::renderer::MessageRenderer;
use crate::progress::reporter::PendingSpinner;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use tabletalk_application::ConversationController;

/// Interactive chat REPL
///
/// Owns a printed-count watermark into the conversation: after every
/// operation only entries past the watermark are rendered. When a
/// reconciliation rewrites history to something shorter, the watermark
/// clamps and the tail is printed again — a scrollback terminal cannot
/// re-render in place.
pub struct ChatRepl {
    controller: ConversationController,
    show_progress: bool,
    use_history: bool,
    printed: usize,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(controller: ConversationController) -> Self {
        Self {
            controller,
            show_progress: true,
            use_history: true,
            printed: 0,
        }
    }

    /// Set whether to show the in-flight spinner
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Set whether to persist readline history
    pub fn with_history(mut self, use_history: bool) -> Self {
        self.use_history = use_history;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self
            .use_history
            .then(|| dirs::data_dir().map(|p| p.join("tabletalk").join("history.txt")))
            .flatten();

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();
        self.start_session().await;

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    self.process_line(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│           tabletalk - Chat Mode             │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /new      - Start a new conversation");
        println!("  /quit     - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /new             - Start a new conversation (discards the current one)");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            "/new" => {
                println!();
                self.start_session().await;
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    /// Start (or restart) the conversation and render its opening turns.
    async fn start_session(&mut self) {
        self.printed = 0;

        let spinner = self
            .show_progress
            .then(|| PendingSpinner::start("Starting conversation..."));
        let _ = self.controller.start_conversation().await;
        if let Some(spinner) = spinner {
            spinner.finish();
        }

        self.render_new();
    }

    async fn process_line(&mut self, line: &str) {
        println!();

        let pending = {
            let controller = self.controller.clone();
            let line = line.to_string();
            tokio::spawn(async move { controller.send_message(&line).await })
        };

        // Show the optimistic user turn as soon as the controller has
        // appended it, before the round trip resolves.
        while !self.controller.snapshot().in_flight && !pending.is_finished() {
            tokio::task::yield_now().await;
        }
        self.render_new();

        let spinner = self
            .show_progress
            .then(|| PendingSpinner::start("Waiting for the assistant..."));
        let _ = pending.await;
        if let Some(spinner) = spinner {
            spinner.finish();
        }

        self.render_new();
        println!();
    }

    /// Render conversation entries past the printed watermark.
    fn render_new(&mut self) {
        let snapshot = self.controller.snapshot();
        if self.printed > snapshot.conversation.len() {
            self.printed = snapshot.conversation.len();
        }
        for message in &snapshot.conversation[self.printed..] {
            println!("{}", MessageRenderer::render(message));
        }
        self.printed = snapshot.conversation.len();
    }
}
