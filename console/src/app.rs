//! Interactive session loop.
//!
//! One menu selection is one request/response cycle: the page is chosen,
//! the gate is consulted, and only then is the page rendered.

use std::path::PathBuf;

use dialoguer::Select;

use domain::Page;
use session_gate::{Predictor, SessionGate};

use crate::pages::{self, PromptResult};

const QUIT_LABEL: &str = "Quit";

pub struct ConsoleApp {
    gate: SessionGate,
    predictor: Option<Box<dyn Predictor>>,
    metrics_report: Option<PathBuf>,
}

impl ConsoleApp {
    pub fn new(
        gate: SessionGate,
        predictor: Option<Box<dyn Predictor>>,
        metrics_report: Option<PathBuf>,
    ) -> Self {
        Self {
            gate,
            predictor,
            metrics_report,
        }
    }

    /// Run until the user quits, then end the session.
    pub async fn run(mut self) -> PromptResult<()> {
        println!("HEART WISE: AI-DRIVEN HEART DISEASE PREDICTION USING NEURAL NETWORKS");

        loop {
            let menu = self.gate.menu();
            let mut labels: Vec<String> = menu.iter().map(Page::to_string).collect();
            labels.push(QUIT_LABEL.to_string());

            let choice = Select::new()
                .with_prompt("Navigation Menu")
                .items(&labels)
                .default(0)
                .interact()?;

            match menu.get(choice) {
                Some(page) => self.show(*page).await?,
                None => break,
            }
        }

        self.gate.logout();
        Ok(())
    }

    async fn show(&mut self, page: Page) -> PromptResult<()> {
        if let Err(denied) = self.gate.guard(page) {
            println!("{}", denied);
            return Ok(());
        }

        match page {
            Page::Login => pages::login(&mut self.gate).await,
            Page::Register => pages::register(&self.gate).await,
            Page::Home => pages::home(&mut self.gate),
            Page::Model => pages::model(&self.gate, self.predictor.as_deref()).await,
            Page::Metrics => {
                pages::metrics(self.metrics_report.as_deref()).await;
                Ok(())
            }
            Page::About => {
                pages::about();
                Ok(())
            }
        }
    }
}
