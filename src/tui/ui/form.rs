//! Patient lab value entry form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{ClinicalObservation, FluidOverload};
use crate::tui::styles::MedicalTheme;
use zeroize::Zeroize;

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub value: String,
    pub min: f64,
    pub max: f64,
}

/// Observation form state
pub struct ObservationFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,

    /// Contribute this case to the research log (off by default)
    pub save_enabled: bool,

    /// Show per-feature attribution with the result
    pub explain_enabled: bool,
}

impl Default for ObservationFormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField {
                    label: "Creatinine",
                    hint: "mg/dL (0-40)",
                    value: String::new(),
                    min: 0.0,
                    max: 40.0,
                },
                FormField {
                    label: "Delta Cr 24h",
                    hint: "mg/dL change (-10-10)",
                    value: String::new(),
                    min: -10.0,
                    max: 10.0,
                },
                FormField {
                    label: "Potassium",
                    hint: "mEq/L (0-12)",
                    value: String::new(),
                    min: 0.0,
                    max: 12.0,
                },
                FormField {
                    label: "Bicarbonate",
                    hint: "mEq/L (0-45)",
                    value: String::new(),
                    min: 0.0,
                    max: 45.0,
                },
                FormField {
                    label: "BUN",
                    hint: "mg/dL (0-300)",
                    value: String::new(),
                    min: 0.0,
                    max: 300.0,
                },
                FormField {
                    label: "pH",
                    hint: "arterial (6.8-7.6)",
                    value: String::new(),
                    min: 6.8,
                    max: 7.6,
                },
                FormField {
                    label: "Urine Output 24h",
                    hint: "mL (0-10000)",
                    value: String::new(),
                    min: 0.0,
                    max: 10_000.0,
                },
                FormField {
                    label: "Fluid Overload",
                    hint: "grade 0=none, 3=anasarca",
                    value: String::new(),
                    min: 0.0,
                    max: 3.0,
                },
                FormField {
                    label: "Encephalopathy",
                    hint: "uremic, 0=no, 1=yes",
                    value: String::new(),
                    min: 0.0,
                    max: 1.0,
                },
            ],
            selected_field: 0,
            error_message: None,
            save_enabled: false,
            explain_enabled: true,
        }
    }
}

impl ObservationFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' || c == '-' {
            self.fields[self.selected_field].value.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.clear();
    }

    /// Wipe all field buffers from memory and clear values.
    ///
    /// Called right after a submission starts so plaintext lab values do
    /// not persist in UI state.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Validate and convert to a ClinicalObservation
    pub fn to_observation(&self) -> Result<ClinicalObservation, String> {
        let mut values = Vec::with_capacity(self.fields.len());

        for field in self.fields.iter() {
            let value: f64 = field
                .value
                .parse()
                .map_err(|_| format!("{}: Invalid number", field.label))?;

            if value < field.min || value > field.max {
                return Err(format!(
                    "{}: Value must be between {} and {}",
                    field.label, field.min, field.max
                ));
            }

            values.push(value);
        }

        let fluid_grade = values[7] as u8;
        if f64::from(fluid_grade) != values[7] {
            return Err("Fluid Overload: grade must be a whole number".to_string());
        }
        let fluid_overload = FluidOverload::from_grade(fluid_grade)?;

        let encephalopathy = match values[8] {
            v if v == 0.0 => false,
            v if v == 1.0 => true,
            _ => return Err("Encephalopathy: must be 0 or 1".to_string()),
        };

        Ok(ClinicalObservation {
            creatinine: values[0],
            delta_creatinine_24h: values[1],
            potassium: values[2],
            bicarbonate: values[3],
            bun: values[4],
            ph: values[5],
            urine_output_24h: values[6],
            fluid_overload,
            encephalopathy,
        })
    }

    /// Load sample data (typical advanced CKD presentation)
    pub fn load_sample_data(&mut self) {
        let sample = [
            "2.0",  // creatinine (mg/dL)
            "0.0",  // delta Cr 24h
            "4.5",  // potassium (mEq/L)
            "24",   // bicarbonate (mEq/L)
            "40",   // BUN (mg/dL)
            "7.4",  // pH
            "1500", // urine output 24h (mL)
            "0",    // fluid overload grade
            "0",    // encephalopathy
        ];
        for (i, val) in sample.iter().enumerate() {
            self.fields[i].value = (*val).to_string();
        }
    }
}

/// Render the lab value entry form
pub fn render_observation_form(
    f: &mut Frame,
    area: Rect,
    state: &ObservationFormState,
    model_error: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(2), // Data options
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], model_error);
    render_form_fields(f, chunks[1], state);
    render_form_options(f, chunks[2], state);
    render_form_footer(f, chunks[3], state);
}

fn render_form_header(f: &mut Frame, area: Rect, model_error: Option<&str>) {
    let line = if let Some(err) = model_error {
        Line::from(vec![
            Span::styled("! Model unavailable - prediction disabled: ", MedicalTheme::danger()),
            Span::styled(err.to_string(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled(" ", MedicalTheme::text()),
            Span::styled("Patient Vitals & Labs", MedicalTheme::title()),
            Span::styled(
                " │ Dialysis-Initiation Risk",
                MedicalTheme::text_secondary(),
            ),
        ])
    };

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &ObservationFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = if is_selected {
            MedicalTheme::border_focused()
        } else {
            MedicalTheme::border()
        };

        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = if field.value.is_empty() {
            Span::styled(field.hint, MedicalTheme::text_muted())
        } else {
            Span::styled(&field.value, MedicalTheme::text())
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            if is_selected {
                Span::styled("▌", MedicalTheme::focused())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn render_form_options(f: &mut Frame, area: Rect, state: &ObservationFormState) {
    fn toggle(on: bool) -> &'static str {
        if on {
            "[x]"
        } else {
            "[ ]"
        }
    }

    let options = Paragraph::new(Line::from(vec![
        Span::styled(" Data options: ", MedicalTheme::text_secondary()),
        Span::styled(toggle(state.save_enabled), MedicalTheme::key_hint()),
        Span::styled(
            " Contribute case to research log (D)   ",
            MedicalTheme::key_desc(),
        ),
        Span::styled(toggle(state.explain_enabled), MedicalTheme::key_hint()),
        Span::styled(" Explain prediction (X)", MedicalTheme::key_desc()),
    ]));

    f.render_widget(options, area);
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &ObservationFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Run Analysis ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample Data ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_parses() {
        let mut state = ObservationFormState::default();
        state.load_sample_data();

        let observation = state.to_observation().expect("sample should parse");
        assert!((observation.creatinine - 2.0).abs() < f64::EPSILON);
        assert_eq!(observation.fluid_overload, FluidOverload::None);
        assert!(!observation.encephalopathy);
    }

    #[test]
    fn test_out_of_range_field_rejected() {
        let mut state = ObservationFormState::default();
        state.load_sample_data();
        state.fields[5].value = "8.2".to_string(); // pH above cap

        let err = state.to_observation().expect_err("must fail");
        assert!(err.contains("pH"));
    }

    #[test]
    fn test_fractional_fluid_grade_rejected() {
        let mut state = ObservationFormState::default();
        state.load_sample_data();
        state.fields[7].value = "1.5".to_string();

        assert!(state.to_observation().is_err());
    }

    #[test]
    fn test_clear_sensitive_wipes_fields() {
        let mut state = ObservationFormState::default();
        state.load_sample_data();
        state.clear_sensitive();

        assert!(state.fields.iter().all(|f| f.value.is_empty()));
        assert_eq!(state.selected_field, 0);
    }
}
