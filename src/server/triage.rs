//! Patient triage conversation served by `POST /chat`.

use super::text::preprocess;

const APPOINTMENT_FOOTER: &str = "<br/><br/>If you have to book appointment online, you may visit this webpage <a href='https://clin.cmcvellore.ac.in/webapt/CMC/Login'>CMC Appointment Booking</a>.<br/><br/>Thank you for visiting our CMC!";

const STUDENT_REPLY: &str = "Great! As a student, you can visit <a href='https://www.cmch-vellore.edu/Content.aspx?pid=P160802002'>CMC Vellore Student portal</a>. Thank you for visiting CMC!";
const JOB_SEEKER_REPLY: &str = "Excellent! I can assist you with your job search. Here's a link <a href='https://www.cmch-vellore.edu/JobVacancy.aspx?jtype=ALL'>CMC Vellore Jobs & Training</a>. Thank you for visiting CMC!";
const ASK_SEX: &str = "Please provide your sex (Male/Female) to proceed.";
const UNKNOWN_VISITOR: &str = "I apologize, but I didn't understand your response. Could you please clarify if you are a Student, Job Seeker, or Patient?";
const ASK_AGE: &str = "Thank you! Now, please enter your age:";
const UNKNOWN_SEX: &str = "I apologize, but I didn't understand your response. Please enter either 'Male' or 'Female' to proceed.";
const ASK_SYMPTOMS: &str = "Thank you! Please describe your main symptoms (separated by commas):";
const INVALID_AGE: &str = "I apologize, but I didn't understand your response. Please enter a valid age.";
const UNKNOWN_SYMPTOMS: &str = "I'm not sure which department is best suited. Can you describe your symptoms in more detail?";

/// Patients younger than this are always referred to Child Health.
const CHILD_AGE_LIMIT: i64 = 16;

pub struct Department {
    pub name: &'static str,
    pub symptoms: &'static [&'static str],
    pub info: &'static str,
}

/// Declaration order breaks score ties.
pub const DEPARTMENTS: &[Department] = &[
    Department {
        name: "Medicine",
        symptoms: &["fever", "cough", "body aches", "nausea", "vomiting", "diarrhea"],
        info: "For information on general medical conditions, visit: <a href='https://www.cmch-vellore.edu/DeptContent.aspx?dept=370'>Medicine Department</a>",
    },
    Department {
        name: "Child Health",
        symptoms: &["fever", "cough", "earache", "diarrhea", "vomiting", "rash"],
        info: "For concerns related to children's health, visit: <a href='https://www.cmch-vellore.edu/DeptContent.aspx?dept=074'>Child Health Department</a>",
    },
    Department {
        name: "Haematology",
        symptoms: &["fatigue", "pale skin", "easy bruising", "bleeding", "frequent infections"],
        info: "Visit a hematologist for evaluation. Find one near you: <a href='https://www.cmch-vellore.edu/DeptContent.aspx?dept=017'>Haematology Department</a>",
    },
    Department {
        name: "Cardiology",
        symptoms: &["chest pain", "shortness of breath", "palpitations", "fatigue", "sweating"],
        info: "Visit a cardiologist for evaluation. Find one near you: <a href='https://www.cmch-vellore.edu/DeptContent.aspx?dept=113'>Cardiology Department</a>",
    },
    Department {
        name: "ENT",
        symptoms: &["earache", "sore throat", "sinus congestion", "runny nose", "loss of voice"],
        info: "Visit an otolaryngologist (ENT) for evaluation. Find one near you: <a href='https://www.cmch-vellore.edu/DeptContent.aspx?dept=013'>ENT Services</a>",
    },
    Department {
        name: "Gastrology",
        symptoms: &[
            "Gas and Acidity", "Indigestion", "Hard Stool", "Vomiting", "Belching", "Hiccups",
            "Bloating", "Flatulence", "Mucoid Stool", "Worm Stool", "Loose Stool",
            "Frequency Dysentery", "Abdomen pain", "RUQ", "LUQ", "RLQ", "LLQ",
            "Blood mixed stool", "Constipation",
        ],
        info: "Visit an Gastroenterologist for evaluation. Find one near you: <a href='https://www.cmch-vellore.edu/DeptContent.aspx?dept=121'>Gastroenterology Department</a>",
    },
    Department {
        name: "Oncology",
        symptoms: &[
            "Bladder cancer", "Breast cancer", "Colorectal Cancer", "Kidney Cancer",
            "Lung Cancer Non small cell", "Lymphoma Non Hodgkin", "Melanoma", "Myeloma",
            "Oral and Oropharyngeal Cancer", "Pancreatic Cancer", "Prostate cancer",
            "Thyroid Cancer", "Uterine Cancer",
        ],
        info: "Visit an Oncologist for evaluation. Find one near you:<a href='https://www.cmch-vellore.edu/Departments.aspx?depttype=ALL'>Oncology Department</a>",
    },
    Department {
        name: "Nephrology",
        symptoms: &[
            "Facial puffiness", "Bilateral Pedel edema", "Dryness oral and skin", "Hair fall",
            "Pallor", "Breathing Difficulty", "Loss of Appetite", "Bad smell",
        ],
        info: "Visit an Nephrologist for evaluation. Find one near you:<a href='https://www.cmch-vellore.edu/DeptContent.aspx?dept=102'>Nephrology Department</a>",
    },
    Department {
        name: "Neurology",
        symptoms: &[
            "Severe head ache", "Recurrent Seizure", "Giddiness", "Unclean Speech",
            "Memory loss", "Weakness of Right limb", "Weakness of Left Upperlimb",
            "Weakness of both upper limb and lower limb",
            "Involuntary movement of upperlimbs and lower limbs", "Imbalance while walking",
            "Chronic head ache", "Learning Disorder", "Wasting of muscles",
            "Tremors of upper limb and lower limb",
        ],
        info: "Visit an Neurologist for evaluation. Find one near you: <a href='https://www.cmch-vellore.edu/DeptContent.aspx?dept=893'>Neurology Department</a>",
    },
    Department {
        name: "Urology",
        symptoms: &[
            "Cancers in Kidney", "Urinary Bladder", "Testes", "Penis or Prostate",
            "Other Prostate problems", "Urinary Infection", "Urine Leakage", "Hematuria",
            "blood in Urine", "Sexual Dysfunction", "Kidney stones", "Urinary TB",
            "Blockage in Urine Pipes",
        ],
        info: "Visit an Urologist for evaluation. Find one near you: <a href='https://www.cmch-vellore.edu/DeptContent.aspx?dept=090'>Urology Department</a>",
    },
];

/// Bước hiện tại của cuộc hội thoại.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    Initial,
    Sex,
    Age {
        sex: String,
    },
    Symptoms {
        sex: String,
        age: i64,
    },
}

/// One visitor's conversation. The symptoms step is terminal: every later message is
/// treated as a new symptom description.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    step: Step,
}

impl Conversation {
    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn reply(&mut self, message: &str) -> String {
        let message = message.to_lowercase();

        match &self.step {
            Step::Initial => {
                if message.contains("student") {
                    STUDENT_REPLY.to_string()
                } else if message.contains("job seeker") {
                    JOB_SEEKER_REPLY.to_string()
                } else if message.contains("patient") {
                    self.step = Step::Sex;
                    ASK_SEX.to_string()
                } else {
                    UNKNOWN_VISITOR.to_string()
                }
            }
            Step::Sex => {
                // "female" contains "male", so one check covers both.
                if message.contains("male") {
                    self.step = Step::Age { sex: message };
                    ASK_AGE.to_string()
                } else {
                    UNKNOWN_SEX.to_string()
                }
            }
            Step::Age { sex } => match message.trim().parse::<i64>() {
                Ok(age) => {
                    self.step = Step::Symptoms {
                        sex: sex.clone(),
                        age,
                    };
                    ASK_SYMPTOMS.to_string()
                }
                Err(_) => INVALID_AGE.to_string(),
            },
            Step::Symptoms { sex, age } => {
                log::debug!("Triage request: sex={}, age={age}", sex.trim());
                recommend(*age, &message)
            }
        }
    }
}

fn recommend(age: i64, symptoms: &str) -> String {
    if age < CHILD_AGE_LIMIT {
        return format!(
            "Based on your age, you should visit the Child Health department. For concerns related to children's health, visit: <a href='https://www.cmch-vellore.edu/DeptContent.aspx?dept=074'>Child Health Department</a>.{APPOINTMENT_FOOTER}"
        );
    }

    match best_department(&preprocess(symptoms)) {
        Some(department) => format!(
            "Based on your description, the {} department might be most suited for your needs. {}{APPOINTMENT_FOOTER}",
            department.name, department.info
        ),
        None => UNKNOWN_SYMPTOMS.to_string(),
    }
}

/// Scores every department by how many symptom tokens occur in its symptom list and
/// returns the first highest scorer, or `None` when nothing matched.
pub fn best_department(tokens: &[String]) -> Option<&'static Department> {
    let mut best: Option<(&'static Department, usize)> = None;

    for department in DEPARTMENTS {
        let haystack = department.symptoms.join(" ").to_lowercase();
        let score = tokens
            .iter()
            .filter(|token| token.split_whitespace().all(|word| haystack.contains(word)))
            .count();

        if best.is_none_or(|(_, top)| score > top) {
            best = Some((department, score));
        }
    }

    best.filter(|(_, score)| *score > 0)
        .map(|(department, _)| department)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        preprocess(text)
    }

    fn patient_aged(age: &str) -> Conversation {
        let mut conversation = Conversation::default();
        conversation.reply("I am a patient");
        conversation.reply("Female");
        conversation.reply(age);
        conversation
    }

    #[test]
    fn visitor_types_are_recognised() {
        let mut conversation = Conversation::default();
        assert!(conversation.reply("I'm a Student").contains("Student portal"));
        assert!(conversation.reply("job seeker here").contains("Jobs & Training"));
        assert_eq!(conversation.reply("hello"), UNKNOWN_VISITOR);
        assert_eq!(conversation.step(), &Step::Initial);
    }

    #[test]
    fn patient_flow_walks_through_every_step() {
        let mut conversation = Conversation::default();

        assert_eq!(conversation.reply("patient"), ASK_SEX);
        assert_eq!(conversation.reply("other"), UNKNOWN_SEX);
        assert_eq!(conversation.reply("Male"), ASK_AGE);
        assert_eq!(conversation.reply("forty"), INVALID_AGE);
        assert_eq!(conversation.reply(" 40 "), ASK_SYMPTOMS);
        assert_eq!(
            conversation.step(),
            &Step::Symptoms {
                sex: "male".to_string(),
                age: 40
            }
        );
    }

    #[test]
    fn children_go_to_child_health() {
        let mut conversation = patient_aged("9");
        let reply = conversation.reply("chest pain");
        assert!(reply.starts_with("Based on your age, you should visit the Child Health"));
        assert!(reply.ends_with("Thank you for visiting our CMC!"));
    }

    #[test]
    fn adults_get_the_best_scoring_department() {
        let mut conversation = patient_aged("45");
        let reply = conversation.reply("chest pain and palpitations");
        assert!(
            reply.starts_with("Based on your description, the Cardiology department"),
            "{reply}"
        );

        // Symptoms step stays active for follow-up descriptions.
        let reply = conversation.reply("blood in urine, kidney stones");
        assert!(reply.contains("the Urology department"), "{reply}");
    }

    #[test]
    fn unmatched_symptoms_ask_for_detail() {
        let mut conversation = patient_aged("30");
        assert_eq!(conversation.reply("xyzzy"), UNKNOWN_SYMPTOMS);
    }

    #[test]
    fn ties_go_to_the_first_department() {
        let department = best_department(&tokens("fever cough")).expect("match");
        assert_eq!(department.name, "Medicine");
    }

    #[test]
    fn matching_ignores_case() {
        let department = best_department(&tokens("constipation, bloating")).expect("match");
        assert_eq!(department.name, "Gastrology");
    }

    #[test]
    fn no_tokens_means_no_department() {
        assert!(best_department(&[]).is_none());
    }
}
