//! Interactive console for curio

use crate::session::{Command, ScanSession};
use anyhow::Result;
use curio_facts::WikiBackend;
use std::io::{self, BufRead, BufReader, Write};

const HELP: &str = "\
Commands:
  start   load the model and start the camera
  scan    identify the object in view and look up a fact
  flip    switch between the front and back cameras
  stop    release the camera
  status  show session state
  help    show this help
  quit    exit";

pub struct Console<B: WikiBackend> {
    session: ScanSession<B>,
}

impl<B: WikiBackend> Console<B> {
    pub fn new(session: ScanSession<B>) -> Self {
        Self { session }
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("curio interactive console");
        println!("{}", HELP);

        let stdin = io::stdin();
        let mut reader = BufReader::new(stdin.lock());

        loop {
            print!("curio> ");
            io::stdout().flush()?;

            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                break; // EOF
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match Command::parse(line) {
                Some(Command::Quit) => break,
                Some(Command::Help) => println!("{}", HELP),
                Some(command) => {
                    let message = self.dispatch(command).await;
                    println!("{}", message);
                }
                None => {
                    println!("❌ Unknown command: {}. Type 'help' for the command list.", line)
                }
            }
        }

        // Leaving the console releases the camera, like closing the page
        self.session.stop();
        Ok(())
    }

    async fn dispatch(&mut self, command: Command) -> String {
        match command {
            Command::Start => self.session.start().await,
            Command::Scan => self.session.scan().await,
            Command::Flip => self.session.flip(),
            Command::Stop => self.session.stop(),
            Command::Status => self.session.status(),
            // Handled by the loop before dispatch
            Command::Help | Command::Quit => String::new(),
        }
    }
}
