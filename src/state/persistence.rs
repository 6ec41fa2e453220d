use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::models::FormInput;

/// Load a saved planning form from a JSON file.
pub fn load_form<P: AsRef<Path>>(path: P) -> Result<FormInput> {
    let content = fs::read_to_string(path.as_ref())?;
    let form: FormInput = serde_json::from_str(&content)?;
    debug!(path = %path.as_ref().display(), "loaded planning form");
    Ok(form)
}

/// Save a planning form as pretty JSON.
pub fn save_form<P: AsRef<Path>>(path: P, form: &FormInput) -> Result<()> {
    let json = serde_json::to_string_pretty(form)?;
    fs::write(path.as_ref(), json)?;
    debug!(path = %path.as_ref().display(), "saved planning form");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodGroup, Macro};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_and_save_roundtrip() {
        let json = r#"{
            "first_name": "Jordan", "sex": "Female", "age": "21",
            "weight_lbs": "140", "servings": {"Fruit": "3"}
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let mut form = load_form(file.path()).unwrap();
        assert_eq!(form.sex, "Female");
        assert_eq!(form.servings.get(&FoodGroup::Fruit).map(String::as_str), Some("3"));

        form.macro_grams.insert(Macro::Protein, "120".into());
        let out_file = NamedTempFile::new().unwrap();
        save_form(out_file.path(), &form).unwrap();

        let reloaded = load_form(out_file.path()).unwrap();
        assert_eq!(reloaded, form);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(load_form(file.path()).is_err());
    }
}
