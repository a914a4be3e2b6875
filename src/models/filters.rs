/// Optional substring filters for the doctor listing.
///
/// Empty strings are treated as absent, matching how query parameters
/// arrive from the HTTP layer.
#[derive(Debug, Default, Clone)]
pub struct DoctorFilter {
    pub specialty: Option<String>,
    pub location: Option<String>,
}

impl DoctorFilter {
    pub fn new(specialty: Option<String>, location: Option<String>) -> Self {
        Self {
            specialty: non_empty(specialty),
            location: non_empty(location),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct AppointmentFilter {
    pub doctor_id: Option<String>,
}

impl AppointmentFilter {
    pub fn for_doctor(doctor_id: Option<String>) -> Self {
        Self {
            doctor_id: non_empty(doctor_id),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_are_no_filter() {
        let filter = DoctorFilter::new(Some(String::new()), Some("Paris".into()));
        assert!(filter.specialty.is_none());
        assert_eq!(filter.location.as_deref(), Some("Paris"));

        let filter = AppointmentFilter::for_doctor(Some(String::new()));
        assert!(filter.doctor_id.is_none());
    }
}
