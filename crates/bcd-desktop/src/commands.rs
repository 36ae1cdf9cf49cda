use std::fmt::Write as _;
use std::path::PathBuf;

use eyre::WrapErr;
use jiff::civil::{Date, DateTime};

use bcd_core::models::imaging::IMAGE_EXTENSIONS;
use bcd_core::vocab::{
    BreastFinding, Indicator, Laterality, MenopausalStatus, Modality, Sex, Side, Technique, Term,
};
use bcd_export::render::{render_preview, render_review};
use bcd_wizard::{FieldEdit, Page, ReviewOutcome};

use crate::state::DesktopState;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Back,
    Submit,
    Show,
    Help,
    Quit,
    Edit(FieldEdit),
    /// `image` without a path: ask the native picker.
    PickImage,
    ReviewEdit,
    Generate(Option<PathBuf>),
    Ai,
}

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Native file dialogs. Swapped out in tests.
pub trait FileDialogs {
    fn pick_image(&self) -> Option<PathBuf>;

    fn save_report(&self, default_name: &str) -> Option<PathBuf>;
}

pub struct NativeDialogs;

impl FileDialogs for NativeDialogs {
    fn pick_image(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select Image")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
    }

    fn save_report(&self, default_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Save PDF")
            .set_file_name(default_name)
            .add_filter("PDF Files", &["pdf"])
            .save_file()
    }
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> eyre::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "next" => Command::Next,
        "back" | "previous" => Command::Back,
        "submit" => Command::Submit,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,

        "name" => Command::Edit(FieldEdit::Name(rest.to_string())),
        "dob" => Command::Edit(FieldEdit::DateOfBirth(parse_date(rest)?)),
        "age" => Command::Edit(FieldEdit::Age(
            rest.parse().wrap_err_with(|| format!("invalid age {rest:?}"))?,
        )),
        "sex" => Command::Edit(FieldEdit::Sex(Sex::parse_label(rest)?)),
        "menopause" => Command::Edit(FieldEdit::MenopausalStatus(
            MenopausalStatus::parse_label(rest)?,
        )),
        "contact" => Command::Edit(FieldEdit::Contact(rest.to_string())),

        "study-id" => Command::Edit(FieldEdit::StudyId(rest.to_string())),
        "study-date" => Command::Edit(FieldEdit::StudyDateTime(parse_datetime(rest)?)),
        "modality" => Command::Edit(FieldEdit::Modality(Modality::parse_label(rest)?)),
        "exam-type" => Command::Edit(FieldEdit::ExamType(rest.to_string())),
        "technique" => Command::Edit(FieldEdit::ToggleTechnique(Technique::at_position(
            parse_position(rest)?,
        )?)),
        "facility" => Command::Edit(FieldEdit::Facility(rest.to_string())),
        "clinician" => Command::Edit(FieldEdit::Clinician(rest.to_string())),

        "right" => finding(Side::Right, rest)?,
        "left" => finding(Side::Left, rest)?,
        "indicator" => Command::Edit(FieldEdit::ToggleIndicator(Indicator::at_position(
            parse_position(rest)?,
        )?)),

        "image" if rest.is_empty() => Command::PickImage,
        "image" => Command::Edit(FieldEdit::ImagePath(Some(PathBuf::from(rest)))),
        "image-type" => Command::Edit(FieldEdit::ImageType(Modality::parse_label(rest)?)),
        "laterality" => Command::Edit(FieldEdit::Laterality(Laterality::parse_label(rest)?)),
        "image-date" => Command::Edit(FieldEdit::ImageDateTime(parse_datetime(rest)?)),
        "ref" => Command::Edit(FieldEdit::ReferenceId(rest.to_string())),
        "description" => Command::Edit(FieldEdit::Description(rest.to_string())),

        "edit" => Command::ReviewEdit,
        "generate" if rest.is_empty() => Command::Generate(None),
        "generate" => Command::Generate(Some(PathBuf::from(rest))),
        "ai" => Command::Ai,

        other => eyre::bail!("unknown command {other:?}, type `help` for a list"),
    };
    Ok(Some(command))
}

fn finding(side: Side, rest: &str) -> eyre::Result<Command> {
    let finding: BreastFinding = side.finding_at(parse_position(rest)?)?;
    Ok(Command::Edit(FieldEdit::ToggleFinding(side, finding)))
}

fn parse_position(value: &str) -> eyre::Result<usize> {
    value
        .parse()
        .wrap_err_with(|| format!("expected a list number, got {value:?}"))
}

fn parse_date(value: &str) -> eyre::Result<Date> {
    value
        .parse()
        .wrap_err_with(|| format!("expected YYYY-MM-DD, got {value:?}"))
}

fn parse_datetime(value: &str) -> eyre::Result<DateTime> {
    DateTime::strptime(DATETIME_FORMAT, value)
        .wrap_err_with(|| format!("expected YYYY-MM-DD HH:MM, got {value:?}"))
}

/// Run one command against the session and write its output.
pub fn execute<D: FileDialogs>(
    state: &mut DesktopState,
    command: Command,
    dialogs: &D,
    today: Date,
    out: &mut String,
) -> eyre::Result<Flow> {
    match command {
        Command::Quit => return Ok(Flow::Quit),
        Command::Help => out.push_str(help_text(state.review.is_some())),
        Command::Show => out.push_str(&render_screen(state)?),
        command if state.review.is_some() => review_command(state, command, dialogs, out)?,
        command => wizard_command(state, command, dialogs, today, out)?,
    }
    Ok(Flow::Continue)
}

fn wizard_command<D: FileDialogs>(
    state: &mut DesktopState,
    command: Command,
    dialogs: &D,
    today: Date,
    out: &mut String,
) -> eyre::Result<()> {
    match command {
        Command::Next => {
            if !state.wizard.next() {
                eyre::bail!("already on the last page, use `submit`");
            }
            out.push_str(&render_screen(state)?);
        }
        Command::Back => {
            if !state.wizard.previous() {
                eyre::bail!("already on the first page");
            }
            out.push_str(&render_screen(state)?);
        }
        Command::Submit => {
            state.review = Some(state.wizard.submit()?);
            out.push_str(&render_screen(state)?);
        }
        Command::Edit(edit) => state.wizard.apply(edit, today)?,
        Command::PickImage => {
            if state.wizard.page() != Page::Imaging {
                eyre::bail!("images are selected on {}", Page::Imaging.title());
            }
            if let Some(path) = dialogs.pick_image() {
                state
                    .wizard
                    .apply(FieldEdit::ImagePath(Some(path)), today)?;
            }
        }
        Command::ReviewEdit | Command::Generate(_) | Command::Ai => {
            eyre::bail!("no review is open, use `submit` on the summary page")
        }
        Command::Show | Command::Help | Command::Quit => {}
    }
    Ok(())
}

fn review_command<D: FileDialogs>(
    state: &mut DesktopState,
    command: Command,
    dialogs: &D,
    out: &mut String,
) -> eyre::Result<()> {
    let Some(review) = state.review.as_mut() else {
        return Ok(());
    };
    match command {
        Command::ReviewEdit => {
            let outcome = review.edit();
            state.wizard.close_review(&outcome);
            state.review = None;
            out.push_str(&render_screen(state)?);
        }
        Command::Ai => {
            review.run_ai_analysis();
            let _ = writeln!(out, "[{}]", review.ai_analysis().label());
        }
        Command::Generate(path) => {
            let file_name = review.default_file_name();
            let destination = match path {
                Some(p) if p.is_dir() => p.join(&file_name),
                Some(p) => p,
                None => match &state.config.export_dir {
                    Some(dir) => dir.join(&file_name),
                    None => match dialogs.save_report(&file_name) {
                        Some(chosen) => chosen,
                        None => {
                            tracing::info!("report save cancelled");
                            out.push_str("Save cancelled, the review is still open.\n");
                            return Ok(());
                        }
                    },
                },
            };
            let outcome = review
                .generate_report(&state.writer, &destination)
                .map_err(|e| eyre::eyre!("Failed to generate PDF: {e}"))?;
            state.wizard.close_review(&outcome);
            state.review = None;
            if let ReviewOutcome::Submitted { report } = outcome {
                let _ = writeln!(out, "PDF report generated: {}", report.display());
            }
            out.push_str("All data has been submitted successfully!\n");
        }
        _ => eyre::bail!("the review is open: use `edit`, `generate [PATH]` or `ai`"),
    }
    Ok(())
}

/// Current page, or the review dialog when one is open.
pub fn render_screen(state: &DesktopState) -> eyre::Result<String> {
    let mut out = String::new();
    if let Some(review) = &state.review {
        out.push_str(&render_review(review.summary())?);
        let _ = writeln!(
            out,
            "\n[Edit] [Generate Report] [{}{}]",
            review.ai_analysis().label(),
            if review.ai_analysis().is_enabled() { "" } else { " (disabled)" }
        );
        return Ok(out);
    }

    let wizard = &state.wizard;
    let form = wizard.form();
    let (page_no, pages) = wizard.progress();
    let _ = writeln!(out, "== {} ==  ({page_no}/{pages})", wizard.page().title());

    match wizard.page() {
        Page::PatientInfo => {
            let p = &form.patient;
            let _ = writeln!(out, "Patient ID:        {}", p.id());
            let _ = writeln!(out, "Name/Code:         {}", p.name);
            let _ = writeln!(out, "Date of Birth:     {}", p.date_of_birth());
            let _ = writeln!(out, "Age:               {}", p.age());
            let _ = writeln!(out, "Sex:               {}", p.sex.label());
            let _ = writeln!(out, "Menopausal Status: {}", p.menopausal_status.label());
            let _ = writeln!(out, "Contact:           {}", p.contact);
        }
        Page::VisitInfo => {
            let v = &form.visit;
            let _ = writeln!(out, "Study ID:            {}", v.study_id);
            let _ = writeln!(
                out,
                "Study Date:          {}",
                v.study_datetime.strftime(DATETIME_FORMAT)
            );
            let _ = writeln!(out, "Imaging Modality:    {}", v.modality.label());
            let _ = writeln!(out, "Examination Type:    {}", v.exam_type);
            out.push_str("Techniques:\n");
            for (i, t) in Technique::all().iter().enumerate() {
                checkbox(&mut out, i + 1, v.techniques.is_checked(*t), t.label());
            }
            let _ = writeln!(out, "Health Facility:     {}", v.facility);
            let _ = writeln!(out, "Reporting Clinician: {}", v.clinician);
        }
        Page::Findings => {
            for side in [Side::Right, Side::Left] {
                let _ = writeln!(out, "{} breast:", capitalized(side));
                let checked = form.findings.side(side);
                for (i, f) in side.vocabulary().iter().enumerate() {
                    checkbox(&mut out, i + 1, checked.is_checked(*f), f.label());
                }
            }
        }
        Page::Indicators => {
            for (i, ind) in Indicator::all().iter().enumerate() {
                checkbox(&mut out, i + 1, form.indicators.is_checked(*ind), ind.label());
            }
        }
        Page::Imaging => {
            let img = &form.imaging;
            let _ = writeln!(out, "Image File:      {}", img.file_label());
            let _ = writeln!(out, "Image Type:      {}", img.image_type.label());
            let _ = writeln!(out, "Laterality:      {}", img.laterality.label());
            let _ = writeln!(
                out,
                "Image Date:      {}",
                img.image_datetime.strftime(DATETIME_FORMAT)
            );
            let _ = writeln!(out, "Image Reference: {}", img.reference_id);
            let _ = writeln!(out, "Description:     {}", img.description);
        }
        Page::Summary => {
            if let Some(preview) = wizard.preview() {
                out.push_str(&render_preview(preview)?);
            }
        }
    }

    let back = if wizard.can_go_back() { "[Previous] " } else { "" };
    let _ = writeln!(out, "\n{back}[{}]", wizard.primary_action().label());
    Ok(out)
}

fn checkbox(out: &mut String, position: usize, checked: bool, label: &str) {
    let mark = if checked { 'x' } else { ' ' };
    let _ = writeln!(out, "  [{mark}] {position}. {label}");
}

fn capitalized(side: Side) -> &'static str {
    match side {
        Side::Right => "Right",
        Side::Left => "Left",
    }
}

fn help_text(reviewing: bool) -> &'static str {
    if reviewing {
        "\
Review commands:
  edit              back to the wizard, data unchanged
  generate [PATH]   write the PDF report and submit
  ai                run AI analysis
  show, help, quit
"
    } else {
        "\
Navigation: next, back, submit (summary page), show, help, quit
Page 1: name TEXT, dob YYYY-MM-DD, age N, sex female, menopause pre|post|unknown, contact TEXT
Page 2: study-id TEXT, study-date YYYY-MM-DD HH:MM, modality ultrasound|mammography|mri,
        exam-type TEXT, technique N, facility TEXT, clinician TEXT
Page 3: right N, left N
Page 4: indicator N
Page 5: image [PATH], image-type ultrasound|mammography|mri, laterality right|left|bilateral,
        image-date YYYY-MM-DD HH:MM, ref TEXT, description TEXT
"
    }
}
