pub struct DefaultsConfig {
    pub wax: String,
    pub compare: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            wax: "paraffin".to_string(),
            compare: true,
        }
    }
}
