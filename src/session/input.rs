//! The URL collection form of the input step.

use crate::resolver;

use super::{PlayMode, WatchRequest, handoff_query};

/// Maximum number of URL fields ever offered.
pub const MAX_FIELDS: usize = 3;

/// State of the input form: a playback mode plus up to three URL fields.
///
/// Starts with a single empty field and grows by one whenever the last
/// field receives a valid reference, capped at [`MAX_FIELDS`]. Submission
/// is blocked while no field holds a valid reference.
#[derive(Debug, Clone)]
pub struct InputForm {
    mode: PlayMode,
    fields: Vec<String>,
}

impl InputForm {
    /// A fresh form with one empty field in video mode.
    pub fn new() -> Self {
        Self {
            mode: PlayMode::Video,
            fields: vec![String::new()],
        }
    }

    /// Current playback mode selection.
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Select the playback mode.
    pub fn set_mode(&mut self, mode: PlayMode) {
        self.mode = mode;
    }

    /// The current field values, in order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Update one field's value.
    ///
    /// When the last field becomes valid a new empty one is appended, up to
    /// the cap. Out-of-range indices are ignored.
    pub fn set_field(&mut self, index: usize, value: impl Into<String>) {
        let Some(field) = self.fields.get_mut(index) else {
            return;
        };
        *field = value.into();

        let grew_from_last = index == self.fields.len() - 1;
        if grew_from_last
            && self.fields.len() < MAX_FIELDS
            && resolver::is_valid(&self.fields[index])
        {
            self.fields.push(String::new());
        }
    }

    /// Whether at least one field holds a valid reference.
    pub fn can_submit(&self) -> bool {
        self.fields.iter().any(|url| resolver::is_valid(url))
    }

    fn valid_urls(&self) -> Vec<&String> {
        self.fields
            .iter()
            .filter(|url| resolver::is_valid(url))
            .collect()
    }

    /// Submit the form, yielding a watch request over the valid entries.
    /// Returns `None` while submission is blocked.
    pub fn submit(&self) -> Option<WatchRequest> {
        if !self.can_submit() {
            return None;
        }
        Some(WatchRequest::from_urls(self.mode, &self.valid_urls()))
    }

    /// The navigation query string for the viewing step, built from the
    /// valid entries only. `None` while submission is blocked.
    pub fn handoff(&self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        Some(handoff_query(self.mode, &self.valid_urls()))
    }
}

impl Default for InputForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[cfg_attr(test, allow(clippy::unwrap_used))]
mod tests {
    use super::*;

    const VALID: [&str; 3] = [
        "https://youtu.be/aaa111",
        "https://youtu.be/bbb222",
        "https://youtu.be/ccc333",
    ];

    #[test]
    fn starts_with_one_empty_field_and_blocked_submission() {
        let form = InputForm::new();
        assert_eq!(form.fields(), &[String::new()]);
        assert!(!form.can_submit());
        assert!(form.submit().is_none());
        assert!(form.handoff().is_none());
    }

    #[test]
    fn valid_last_field_grows_the_form() {
        let mut form = InputForm::new();
        form.set_field(0, VALID[0]);
        assert_eq!(form.fields().len(), 2);
        form.set_field(1, VALID[1]);
        assert_eq!(form.fields().len(), 3);
    }

    #[test]
    fn never_offers_more_than_three_fields() {
        let mut form = InputForm::new();
        for (index, url) in VALID.iter().enumerate() {
            form.set_field(index, *url);
        }
        assert_eq!(form.fields().len(), MAX_FIELDS);

        form.set_field(2, "https://youtu.be/replacement");
        assert_eq!(form.fields().len(), MAX_FIELDS);
    }

    #[test]
    fn invalid_input_does_not_grow_the_form() {
        let mut form = InputForm::new();
        form.set_field(0, "not a url");
        assert_eq!(form.fields().len(), 1);
        assert!(!form.can_submit());
    }

    #[test]
    fn editing_an_earlier_field_does_not_grow_the_form() {
        let mut form = InputForm::new();
        form.set_field(0, VALID[0]);
        assert_eq!(form.fields().len(), 2);
        form.set_field(0, VALID[1]);
        assert_eq!(form.fields().len(), 2);
    }

    #[test]
    fn submit_keeps_only_valid_entries_in_order() {
        let mut form = InputForm::new();
        form.set_field(0, VALID[0]);
        form.set_field(1, "garbage");
        form.set_mode(PlayMode::Live);

        let request = form.submit().unwrap();
        assert_eq!(request.mode, PlayMode::Live);
        assert_eq!(request.refs.len(), 1);
        assert_eq!(request.refs[0].as_str(), "aaa111");
    }

    #[test]
    fn handoff_query_round_trips() {
        let mut form = InputForm::new();
        form.set_field(0, VALID[0]);
        form.set_field(1, VALID[1]);

        let query = form.handoff().unwrap();
        let request = WatchRequest::from_query(&query);
        assert_eq!(request.refs.len(), 2);
    }

    #[test]
    fn out_of_range_field_updates_are_ignored() {
        let mut form = InputForm::new();
        form.set_field(7, VALID[0]);
        assert_eq!(form.fields(), &[String::new()]);
    }
}
