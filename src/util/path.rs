use std::path::Path;

pub trait PathExt {
    /// Name starts with `.`, excluding the `.` and `..` pseudo entries.
    fn is_hidden(&self) -> bool;
    /// Final component as display text, or the whole path if there is none.
    fn file_label(&self) -> String;
}

impl PathExt for Path {
    fn is_hidden(&self) -> bool {
        match self.file_name() {
            Some(name) => {
                let name = name.to_string_lossy();
                name.starts_with('.') && name != "." && name != ".."
            }
            None => false,
        }
    }

    fn file_label(&self) -> String {
        match self.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.display().to_string(),
        }
    }
}
