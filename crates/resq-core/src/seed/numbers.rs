use crate::models::EmergencyNumber;

/// (id, name, number, description, category)
const EMERGENCY_NUMBERS: &[(&str, &str, &str, &str, &str)] = &[
    ("1", "Police Control Room", "100", "For immediate police assistance and emergencies", "police"),
    ("2", "Women Helpline", "1091", "National helpline for women in distress", "women"),
    ("3", "Ambulance", "102", "Emergency medical services", "medical"),
    ("4", "Domestic Violence Helpline", "181", "Support for victims of domestic violence", "women"),
    ("5", "Fire Emergency", "101", "Fire brigade and rescue services", "emergency"),
    ("6", "National Emergency Number", "112", "Unified emergency response system", "emergency"),
    ("7", "Women Police Helpline", "1090", "Direct connection to women police officers", "women"),
    ("8", "Anti-Stalking Helpline", "1096", "Report stalking and harassment cases", "women"),
    ("9", "Student/Child Helpline", "1098", "Support for children in distress", "children"),
    ("10", "Senior Citizen Helpline", "1291", "Emergency assistance for senior citizens", "elderly"),
    ("11", "Railway Protection", "1512", "Security helpline for railway premises", "transport"),
    ("12", "Cyber Crime Helpline", "155620", "Report cyber crimes and online harassment", "cyber"),
    ("13", "National Human Rights Commission", "1800-180-1571", "Report human rights violations", "rights"),
    ("14", "Tourist Police", "1363", "Emergency assistance for tourists", "tourist"),
    ("15", "Anti-Poison", "1066", "Emergency poison control center", "medical"),
    ("16", "Road Accident Emergency", "1073", "Highway patrol and accident response", "transport"),
    ("17", "AIDS Helpline", "1097", "AIDS healthcare and counseling", "medical"),
    ("18", "Mental Health Helpline", "1800-599-0019", "Mental health support and counseling", "medical"),
    ("19", "Missing Children and Women", "1094", "Report missing persons cases", "women"),
    ("20", "National Investigation Agency", "1800-11-1363", "Report terrorism and national security threats", "security"),
];

pub fn emergency_numbers() -> Vec<EmergencyNumber> {
    EMERGENCY_NUMBERS
        .iter()
        .map(|&(id, name, number, description, category)| {
            EmergencyNumber::new(id, name, number, category, Some(description))
        })
        .collect()
}
