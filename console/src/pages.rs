//! Page renderers.
//!
//! Callers check the gate before invoking any renderer for a protected
//! page. Renderers only print and prompt.

use std::path::Path;
use std::str::FromStr;

use dialoguer::{Confirm, Input, Password, Select};

use domain::{AuthError, Gender, HealthRecord, RiskLevel};
use session_gate::{InferenceError, Predictor, SessionGate};

pub type PromptResult<T> = Result<T, dialoguer::Error>;

pub async fn login(gate: &mut SessionGate) -> PromptResult<()> {
    println!("User Login");
    let username: String = Input::new()
        .with_prompt("Username")
        .allow_empty(true)
        .interact_text()?;
    let password = Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;

    match gate.login(&username, &password).await {
        Ok(_) => println!("Welcome, {}!", username),
        Err(e) => report(&e),
    }
    Ok(())
}

pub async fn register(gate: &SessionGate) -> PromptResult<()> {
    println!("User Registration");
    let username: String = Input::new()
        .with_prompt("Choose a Username")
        .allow_empty(true)
        .interact_text()?;

    match gate.is_username_taken(&username).await {
        Ok(true) => {
            report(&AuthError::UsernameTaken);
            return Ok(());
        }
        Ok(false) => {}
        Err(e) => {
            report(&e);
            return Ok(());
        }
    }

    let password = Password::new()
        .with_prompt("Choose a Password")
        .allow_empty_password(true)
        .interact()?;
    let confirm = Password::new()
        .with_prompt("Confirm Password")
        .allow_empty_password(true)
        .interact()?;

    match gate.register(&username, &password, &confirm).await {
        Ok(_) => println!("Registration successful! Please go to the Login page."),
        Err(e) => report(&e),
    }
    Ok(())
}

pub fn home(gate: &mut SessionGate) -> PromptResult<()> {
    println!("Heart Disease Prediction");
    if let Some(identity) = gate.identity() {
        println!("Logged in as: {}", identity);
    }

    println!();
    println!("Overview");
    println!(
        "This application uses an artificial neural network to estimate the likelihood \
         of heart disease from patient health data."
    );
    println!();
    println!("Dataset Features");
    for feature in HealthRecord::FEATURES {
        println!("  - {}", feature);
    }
    println!();

    let logout = Confirm::new()
        .with_prompt("Logout?")
        .default(false)
        .interact()?;
    if logout {
        gate.logout();
        println!("You have been logged out.");
    }
    Ok(())
}

pub async fn model(gate: &SessionGate, predictor: Option<&dyn Predictor>) -> PromptResult<()> {
    let Some(predictor) = predictor else {
        println!("No model is configured. Set MODEL_COMMAND to enable predictions.");
        return Ok(());
    };

    println!("Enter patient health parameters");
    let record = read_health_record()?;

    match gate.predict(predictor, &record).await {
        Ok(outcome) => {
            println!(
                "Estimated probability of heart disease: {:.1}%",
                outcome.probability * 100.0
            );
            match outcome.level {
                RiskLevel::High => println!(
                    "High risk. Please consult a cardiologist and review diet and lifestyle."
                ),
                RiskLevel::Low => println!("Low risk. Keep up a heart-healthy lifestyle."),
            }
        }
        Err(InferenceError::Denied(denied)) => println!("{}", denied),
        Err(e) => {
            tracing::error!(error = %e, "Prediction failed");
            println!("Prediction failed. Please try again later.");
        }
    }
    Ok(())
}

pub async fn metrics(report: Option<&Path>) {
    println!("Model Metrics and Performance");
    let Some(path) = report else {
        println!("No metrics report configured. Set METRICS_REPORT_PATH.");
        return;
    };

    match load_report(path).await {
        ReportView::Excerpt { lines, truncated } => {
            println!("Model performance report: {}", path.display());
            println!();
            for line in &lines {
                println!("{}", line);
            }
            if truncated {
                println!("...");
                println!("Open the report in a browser to view the full content.");
            }
        }
        ReportView::NotFound => println!("Report not found at {}.", path.display()),
        ReportView::Unreadable(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read metrics report");
            println!("Error loading report: {}", e);
        }
    }
}

/// Number of non-blank report lines shown on the Metrics page
const REPORT_EXCERPT_LINES: usize = 20;

#[derive(Debug)]
enum ReportView {
    Excerpt { lines: Vec<String>, truncated: bool },
    NotFound,
    Unreadable(std::io::Error),
}

async fn load_report(path: &Path) -> ReportView {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ReportView::NotFound,
        Err(e) => return ReportView::Unreadable(e),
    };

    let text = String::from_utf8_lossy(&bytes);
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let excerpt: Vec<String> = lines
        .by_ref()
        .take(REPORT_EXCERPT_LINES)
        .map(str::to_string)
        .collect();
    let truncated = lines.next().is_some();

    ReportView::Excerpt {
        lines: excerpt,
        truncated,
    }
}

pub fn about() {
    println!("About the Project");
    println!(
        "HeartWise applies an artificial neural network to routine clinical \
         measurements to support early detection of heart disease."
    );
    println!();
    println!("Heart-Healthy Lifestyle Tips");
    println!("  - Start the day with a healthy breakfast such as oatmeal, fruit and nuts.");
    println!("  - Get 30 minutes of activity, like walking or cycling.");
    println!("  - Reduce salt intake and avoid smoking.");
    println!("  - Monitor your cholesterol and blood pressure.");
}

/// Print the message category for an authentication failure.
fn report(err: &AuthError) {
    if let AuthError::StoreUnavailable(_) | AuthError::Internal(_) = err {
        tracing::error!(error = %err, "Authentication request failed");
    }
    println!("{}", err.user_message());
}

fn read_health_record() -> PromptResult<HealthRecord> {
    let gender = match Select::new()
        .with_prompt("GENDER")
        .items(&["Female", "Male"])
        .default(0)
        .interact()?
    {
        0 => Gender::Female,
        _ => Gender::Male,
    };

    Ok(HealthRecord {
        age: number("AGE")?,
        gender,
        resting_bp: number("RESTING_BP")?,
        serum_cholesterol: number("SERUM_CHOLESTEROL")?,
        triglycerides: number("TRI_GLYCERIDE")?,
        ldl: number("LDL")?,
        hdl: number("HDL")?,
        fasting_blood_sugar: number("FBS")?,
        chest_pain: number("CHEST_PAIN")?,
        resting_ecg: number("RESTING_ECG")?,
        stress_test: number("TMT")?,
        echo: number("ECHO")?,
        max_heart_rate: number("MAX_HEART_RATE")?,
    })
}

fn number<T>(prompt: &str) -> PromptResult<T>
where
    T: Clone + ToString + FromStr,
    <T as FromStr>::Err: ToString,
{
    Input::<T>::new().with_prompt(prompt).interact_text()
}
