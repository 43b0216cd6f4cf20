#![allow(dead_code)]

use essay_facsimile::{Annotation, GradingResult, Geometry, RenderRequest, Scores, Span, Summary};

/// Routes library logs through the test harness; set RUST_LOG to see them.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Base-unit geometry (702x993 page) keeps test canvases small.
pub fn geo() -> Geometry {
    Geometry::scaled(1)
}

pub const ESSAY_TITLE: &str = "一场有趣的投篮游戏";

pub const ESSAY: &str = "今天的阳光明媚，小鸟在树间欢快地歌唱，校园里一片生机勃勃。午休时，我们班的同学们聚集在操场上，准备进行一场有趣的投篮游戏。\n\
我们首先分成了两队，一队是蓝队，另一队是红队。蓝队的队员有我、小明和小华，红队则由小丽、小杰和小雨组成。比赛规则很简单，每人轮流投篮，看哪队投进去的篮球最多，最后得分高的队伍获胜。游戏开始前，我们都迫不及待想要展示自己的投篮技术。\n\
我第一个上场，心里有些紧张，但我告诉自己要放轻松。当我拿起篮球站在三分线外时，心里默念着：“一定要投进去！”我深吸一口气，认真地瞄准篮筐，轻轻一抛，篮球在空中划出一个优美的弧线，终于“咚”地一声进了篮筐！我兴奋地挥舞起双手，队友们也为我欢呼鼓掌。\n\
接下来的轮到小明和小华，他们也都非常出色，轮番投中多个球，使蓝队的分数不断攀升。红队的小丽投篮技术也很不错，虽然一开始有些失误，但她很快调整状态，接连投中几球，为红队追赶分数。\n\
随着比赛的进行，大家的气氛越来越热烈，操场上充满了欢声笑语。有的同学为自己的队友加油打气，有的则在一旁跃跃欲试。突然，小杰的投篮时机把握得非常好，他一连投中了三球，红队的分数迅速上涨，让我们感受到了一些压力。\n\
比赛进入了尾声，我和队友们迅速商量战术，决定增加配合，尽量打好每一次投篮。最后的几轮，我和小明默契地传球，终于又得到了几分。经过激烈的角逐，最后的比分是蓝队35分，红队30分，蓝队获得了胜利。\n\
虽然红队输掉了比赛，但大家都十分开心。我们一起庆祝，享受着这个愉快的时刻。在游戏结束后，我们互相祝贺，也约定下次再来挑战。今天的投篮游戏不仅锻炼了我们的身体，更让我们体会到了友谊和团队协作的重要性。\n\
这场投篮游戏让我留下了深刻的印象，我希望以后还能有更多这样的活动，让我们的校园生活更加丰富多彩！";

pub fn typo(start: usize, end: usize, original: &str, revised: &str) -> Span {
    Span {
        start,
        end,
        annotation: Annotation::Typo {
            original: original.into(),
            revised: revised.into(),
        },
        extra: vec![],
    }
}

pub fn grammar(start: usize, end: usize, revised: &str, label: Option<&str>) -> Span {
    Span {
        start,
        end,
        annotation: Annotation::Grammar {
            revised: Some(revised.into()),
            label: label.map(Into::into),
        },
        extra: vec![],
    }
}

pub fn highlight(start: usize, end: usize) -> Span {
    Span {
        start,
        end,
        annotation: Annotation::Highlight { text: None },
        extra: vec![],
    }
}

pub fn rhetoric(start: usize, end: usize, devices: &[&str]) -> Span {
    Span {
        start,
        end,
        annotation: Annotation::Rhetoric {
            devices: devices.iter().map(|d| d.to_string()).collect(),
        },
        extra: vec![],
    }
}

pub fn request(title: &str, content: &str, spans: Vec<Span>) -> RenderRequest {
    let paragraphs = content.split('\n').count();
    RenderRequest {
        title: title.into(),
        content: content.into(),
        grading: GradingResult {
            spans,
            paragraph_comments: (0..paragraphs).map(|i| format!("第{}段点评", i + 1)).collect(),
            summary: Summary {
                comment: "文章叙事完整，细节生动。".into(),
                suggestion: "结尾可以再升华主题。".into(),
                scores: Scores {
                    overall: 4.5,
                    content: 4.0,
                    expression: 4.0,
                    relevance: 5.0,
                },
            },
        },
    }
}

/// The sample essay with spans of every kind spread across paragraphs.
pub fn graded_essay() -> RenderRequest {
    let offset_of = |needle: &str| {
        let byte = ESSAY.find(needle).expect("needle in essay");
        ESSAY[..byte].chars().count()
    };
    let span_of = |needle: &str| {
        let start = offset_of(needle);
        (start, start + needle.chars().count())
    };

    let (s1, e1) = span_of("阳光明媚");
    let (s2, e2) = span_of("小鸟在树间欢快地歌唱");
    let (s3, e3) = span_of("迫不及待");
    let (s4, e4) = span_of("接下来的轮到小明和小华");
    let (s5, e5) = span_of("跃跃欲试");
    let (s6, e6) = span_of("丰富多彩");
    request(
        ESSAY_TITLE,
        ESSAY,
        vec![
            highlight(s1, e1),
            rhetoric(s2, e2, &["拟人"]),
            highlight(s3, e3),
            grammar(s4, e4, "接下来轮到小明和小华", Some("成分多余")),
            typo(s5, e5, "跃跃欲试", "跃跃欲试"),
            rhetoric(s5, e5, &["夸张"]),
            highlight(s6, e6),
        ],
    )
}

/// `paragraphs` paragraphs of `len` characters each.
pub fn long_content(paragraphs: usize, len: usize) -> String {
    let sample: Vec<char> = ESSAY.chars().filter(|c| *c != '\n').collect();
    (0..paragraphs)
        .map(|p| {
            (0..len)
                .map(|i| sample[(p * len + i) % sample.len()])
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
