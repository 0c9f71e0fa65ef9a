//! Built-in practice bank used when no question file is given.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::models::{AnswerOption, Difficulty, Question, Subject};

const OPTION_LETTERS: [char; 4] = ['a', 'b', 'c', 'd'];

struct Template {
    topic: &'static str,
    difficulty: Difficulty,
    text: &'static str,
    options: [&'static str; 4],
    correct: usize,
}

const MATH: &[Template] = &[
    Template {
        topic: "algebra",
        difficulty: Difficulty::Easy,
        text: "Solve for x: 2x + 3 = 7",
        options: ["x = 1", "x = 2", "x = 3", "x = 4"],
        correct: 1,
    },
    Template {
        topic: "algebra",
        difficulty: Difficulty::Medium,
        text: "Solve for x: 3x - 5 = 2x + 4",
        options: ["x = 7", "x = 8", "x = 9", "x = 10"],
        correct: 2,
    },
    Template {
        topic: "algebra",
        difficulty: Difficulty::Hard,
        text: "Solve the system: 2x + 3y = 7, 3x - y = 5",
        options: ["x = 1, y = 2", "x = 3, y = 1/3", "x = 2, y = 3", "x = 2, y = 1"],
        correct: 3,
    },
    Template {
        topic: "geometry",
        difficulty: Difficulty::Easy,
        text: "ما هي مساحة مستطيل طوله 6 متر وعرضه 4 متر؟",
        options: ["20 متر مربع", "24 متر مربع", "10 متر مربع", "18 متر مربع"],
        correct: 1,
    },
    Template {
        topic: "geometry",
        difficulty: Difficulty::Medium,
        text: "What is the area of a circle of radius 7 cm? (use π = 3.14)",
        options: ["43.96 cm²", "21.98 cm²", "153.86 cm²", "49 cm²"],
        correct: 2,
    },
    Template {
        topic: "geometry",
        difficulty: Difficulty::Hard,
        text: "What is the height of an equilateral triangle with side 8 cm?",
        options: ["4√3 cm", "4 cm", "8√2 cm", "16 cm"],
        correct: 0,
    },
    Template {
        topic: "arithmetic",
        difficulty: Difficulty::Easy,
        text: "ما هو ناتج 28 ÷ 4 × 3 + 7؟",
        options: ["35", "21", "28", "24"],
        correct: 2,
    },
    Template {
        topic: "arithmetic",
        difficulty: Difficulty::Medium,
        text: "What is 15% of 240?",
        options: ["36", "30", "40", "25"],
        correct: 0,
    },
    Template {
        topic: "arithmetic",
        difficulty: Difficulty::Hard,
        text: "One number is 5 more than twice another and their sum is 26. What is the larger number?",
        options: ["17", "19", "21", "7"],
        correct: 1,
    },
    Template {
        topic: "statistics",
        difficulty: Difficulty::Easy,
        text: "ما هو المتوسط الحسابي للأعداد: 5، 7، 8، 10، 15؟",
        options: ["10", "8", "7.5", "9"],
        correct: 3,
    },
    Template {
        topic: "statistics",
        difficulty: Difficulty::Medium,
        text: "What is the median of 12, 15, 17, 19, 21, 22, 35?",
        options: ["21", "19", "17", "20"],
        correct: 1,
    },
    Template {
        topic: "statistics",
        difficulty: Difficulty::Hard,
        text: "A data set has standard deviation 4. Every value is multiplied by 3. What is the new standard deviation?",
        options: ["7", "4", "12", "36"],
        correct: 2,
    },
    Template {
        topic: "probability",
        difficulty: Difficulty::Easy,
        text: "A fair die is rolled. What is the probability of a number greater than 4?",
        options: ["1/2", "1/3", "1/6", "2/3"],
        correct: 1,
    },
    Template {
        topic: "probability",
        difficulty: Difficulty::Medium,
        text: "A bag holds 4 red, 3 blue and 5 green balls. What is the probability of drawing a blue one?",
        options: ["1/4", "1/3", "1/6", "5/12"],
        correct: 0,
    },
    Template {
        topic: "probability",
        difficulty: Difficulty::Hard,
        text: "إذا كان لدينا 7 كتب مختلفة، كم طريقة لترتيبها على رف؟",
        options: ["720", "2520", "1260", "5040"],
        correct: 3,
    },
];

const ARABIC: &[Template] = &[
    Template {
        topic: "grammar",
        difficulty: Difficulty::Easy,
        text: "ما هو جمع كلمة \"كتاب\"؟",
        options: ["كتابات", "كُتُب", "مكاتب", "كتائب"],
        correct: 1,
    },
    Template {
        topic: "grammar",
        difficulty: Difficulty::Medium,
        text: "ما هو إعراب كلمة \"محمد\" في جملة \"قرأ محمد الكتاب\"؟",
        options: ["فاعل مرفوع", "مفعول به منصوب", "مبتدأ مرفوع", "خبر مرفوع"],
        correct: 0,
    },
    Template {
        topic: "grammar",
        difficulty: Difficulty::Hard,
        text: "ما الضبط الصحيح لحرف الضاد في كلمة \"ضرب\" في قولنا: ضرب زيد عمرا؟",
        options: ["الضم", "الكسر", "الفتح", "السكون"],
        correct: 2,
    },
    Template {
        topic: "vocabulary",
        difficulty: Difficulty::Easy,
        text: "ما هو المعنى الصحيح لكلمة \"ساطع\"؟",
        options: ["مُظلم", "سريع", "بطيء", "مُضيء"],
        correct: 3,
    },
    Template {
        topic: "vocabulary",
        difficulty: Difficulty::Medium,
        text: "ما هو المعنى الصحيح لكلمة \"مؤانسة\"؟",
        options: ["معاداة", "مؤالفة وملاطفة", "مخالفة", "مواجهة"],
        correct: 1,
    },
    Template {
        topic: "vocabulary",
        difficulty: Difficulty::Hard,
        text: "ما هو مرادف كلمة \"الشنآن\"؟",
        options: ["البغضاء", "المحبة", "الفرح", "الغضب"],
        correct: 0,
    },
    Template {
        topic: "reading",
        difficulty: Difficulty::Easy,
        text: "\"المدرسة مكان للتعلم\". ما هي الكلمة التي تدل على المكان في هذه الجملة؟",
        options: ["التعلم", "المدرسة", "للتعلم", "لا توجد كلمة تدل على المكان"],
        correct: 1,
    },
    Template {
        topic: "reading",
        difficulty: Difficulty::Medium,
        text: "\"يعد الأدب العربي من أغنى الآداب العالمية، فقد تطور على مر العصور\". ما هو موضوع الفقرة؟",
        options: ["الآداب العالمية", "تطور العصور", "الأدب العربي", "أشكال الشعر"],
        correct: 2,
    },
    Template {
        topic: "reading",
        difficulty: Difficulty::Hard,
        text: "\"إن العمل المتقن يترك بصمة في قلوب الناس، بينما العمل الرديء سرعان ما ينسى\". ما الفكرة الرئيسية؟",
        options: ["أهمية إتقان العمل", "ذاكرة الناس", "سرعة النسيان", "قلوب الناس"],
        correct: 0,
    },
    Template {
        topic: "semantics",
        difficulty: Difficulty::Easy,
        text: "ما هو ضد كلمة \"سعادة\"؟",
        options: ["فرح", "سرور", "بهجة", "حزن"],
        correct: 3,
    },
    Template {
        topic: "semantics",
        difficulty: Difficulty::Medium,
        text: "اختر الكلمة التي لا تنتمي إلى المجموعة: قلم، دفتر، كتاب، تلميذ",
        options: ["قلم", "دفتر", "تلميذ", "كتاب"],
        correct: 2,
    },
    Template {
        topic: "semantics",
        difficulty: Difficulty::Hard,
        text: "ما هو المعنى المناسب لكلمة \"عين\" في جملة \"جلست عند عين الماء\"؟",
        options: ["العين التي نرى بها", "منبع الماء", "الجاسوس", "الشيء الثمين"],
        correct: 1,
    },
    Template {
        topic: "syntax",
        difficulty: Difficulty::Easy,
        text: "ما نوع \"لم\" في جملة \"لم يحضر الطالب\"؟",
        options: ["حرف نفي وجزم", "حرف نصب", "حرف استفهام", "حرف نداء"],
        correct: 0,
    },
    Template {
        topic: "syntax",
        difficulty: Difficulty::Medium,
        text: "ما هو إعراب \"الكتاب\" في جملة \"قرأت الكتاب\"؟",
        options: ["فاعل مرفوع", "مبتدأ مرفوع", "خبر مرفوع", "مفعول به منصوب"],
        correct: 3,
    },
    Template {
        topic: "syntax",
        difficulty: Difficulty::Hard,
        text: "ما إعراب جملة \"يقول الحق\" في قوله تعالى: \"والله يقول الحق\"؟",
        options: [
            "جملة فعلية في محل نصب حال",
            "جملة فعلية في محل رفع خبر",
            "جملة فعلية في محل نصب مفعول به",
            "جملة فعلية في محل جر مضاف إليه",
        ],
        correct: 1,
    },
];

fn templates(subject: Subject) -> &'static [Template] {
    match subject {
        Subject::Math => MATH,
        Subject::Arabic => ARABIC,
    }
}

/// Generate `count` practice questions, each on a randomly chosen topic.
///
/// With no difficulty every difficulty is eligible. Ids run `q-1`, `q-2`, …
/// with options `q-1-a` … `q-1-d`.
pub fn generate_questions<R: Rng + ?Sized>(
    subject: Subject,
    difficulty: Option<Difficulty>,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let eligible: Vec<&Template> = templates(subject)
        .iter()
        .filter(|template| difficulty.is_none_or(|d| template.difficulty == d))
        .collect();

    (1..=count)
        .filter_map(|number| {
            let template = eligible.choose(rng)?;
            Some(build(template, subject, number))
        })
        .collect()
}

fn build(template: &Template, subject: Subject, number: usize) -> Question {
    let options = template
        .options
        .iter()
        .zip(OPTION_LETTERS)
        .map(|(text, letter)| AnswerOption::new(format!("q-{number}-{letter}"), *text))
        .collect();
    let correct = format!("q-{number}-{}", OPTION_LETTERS[template.correct]);

    Question::new(
        format!("q-{number}"),
        template.text,
        options,
        correct,
        template.topic,
        template.difficulty,
        subject,
    )
    .expect("built-in template is malformed")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_templates_are_well_formed() {
        for subject in Subject::ALL {
            for difficulty in Difficulty::ALL {
                let count = templates(subject)
                    .iter()
                    .filter(|t| t.difficulty == difficulty)
                    .count();
                assert_eq!(count, 5, "{subject} {difficulty}");
            }
            assert!(templates(subject).iter().all(|t| t.correct < 4));
        }
    }

    #[test]
    fn test_generate_respects_count_and_filter() {
        let mut rng = StdRng::seed_from_u64(42);
        let questions = generate_questions(Subject::Math, Some(Difficulty::Easy), 15, &mut rng);

        assert_eq!(questions.len(), 15);
        assert!(questions.iter().all(|q| q.difficulty() == Difficulty::Easy));
        assert!(questions.iter().all(|q| q.subject() == Subject::Math));
        assert_eq!(questions[0].id().as_str(), "q-1");
        assert_eq!(questions[14].id().as_str(), "q-15");
        assert_eq!(questions[2].options()[3].id.as_str(), "q-3-d");
    }

    #[test]
    fn test_generate_any_difficulty() {
        let mut rng = StdRng::seed_from_u64(3);
        let questions = generate_questions(Subject::Arabic, None, 55, &mut rng);
        assert_eq!(questions.len(), 55);
        assert!(questions.iter().all(|q| q.subject() == Subject::Arabic));
    }
}
