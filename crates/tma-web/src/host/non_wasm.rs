use super::*;

pub fn detect() -> Option<Rc<dyn HostPort>> {
    None
}

pub fn page_url() -> String {
    String::new()
}

pub fn browser_language() -> Option<String> {
    None
}
