use pretty_assertions::assert_eq;
use study_forge::{
    config::StudyConfig,
    embedding::{cosine_similarity, pseudo::PseudoEmbedder, TopicEmbedder},
    models::{CorrectAnswer, QuestionKind},
    pipeline::{PipelineProgress, PipelineStage, TemplatePipeline},
    quiz::{Answer, Feedback, QuizPhase, QuizSession},
    session::TemplateSession,
    EMBEDDING_DIMENSION,
};
use tokio::sync::mpsc;

#[tokio::test]
async fn test_recursion_material() {
    let pipeline = TemplatePipeline::from_config(&StudyConfig::instant());
    let material = pipeline.run("Recursion").await.unwrap();

    assert_eq!(material.quiz.len(), 6);
    assert_eq!(material.examples.len(), 5);
    assert!(material.code.python.contains("class Recursion"));
    assert!(material.code.java.contains("public class Recursion"));
    assert!(material.notes.contains("Recursion"));
    assert!(!material.explanation.is_empty());
}

#[tokio::test]
async fn test_embedding_is_deterministic_across_case() {
    let embedder = PseudoEmbedder::new(0);
    let a = embedder.embed("Binary Search Trees").await.unwrap();
    let b = embedder.embed("binary search trees").await.unwrap();

    assert_eq!(a.embedding.len(), EMBEDDING_DIMENSION);
    assert_eq!(a.embedding, b.embedding);
    assert_eq!(a.topic, "Binary Search Trees");
    assert!((cosine_similarity(&a.embedding, &b.embedding) - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_session_progress_over_channel() {
    let session = TemplateSession::from_config(&StudyConfig::instant());
    let (tx, mut rx) = mpsc::unbounded_channel::<PipelineProgress>();

    session.generate("Hash Tables", &tx).await.unwrap();
    drop(tx);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    let stages: Vec<PipelineStage> = events.iter().map(|e| e.stage).collect();
    assert_eq!(stages, PipelineStage::ALL.to_vec());
    assert!(events.windows(2).all(|w| w[0].progress < w[1].progress));
    assert_eq!(events.last().map(|e| e.progress), Some(100));
    assert_eq!(session.topic().await.as_deref(), Some("Hash Tables"));
}

#[tokio::test]
async fn test_generate_then_take_quiz() {
    let session = TemplateSession::from_config(&StudyConfig::instant());
    let material = session
        .generate("Linked Lists", &study_forge::pipeline::NoProgress)
        .await
        .unwrap();

    let mut quiz = QuizSession::new(material.quiz.clone());

    // Answer everything correctly from the material itself
    for question in material.quiz.iter() {
        match (&question.kind, &question.correct_answer) {
            (QuestionKind::ShortAnswer, CorrectAnswer::Text(text)) => {
                assert!(quiz.input_short_answer(text.to_uppercase()).unwrap());
                assert!(quiz.submit_short_answer().unwrap());
            }
            (_, CorrectAnswer::Index(i)) => {
                assert!(quiz.select_option(*i).unwrap());
            }
            (kind, answer) => panic!("unexpected {kind:?} with {answer:?}"),
        }
        assert_eq!(quiz.answer(&question.id).is_some(), true);
        assert!(quiz.next());
    }

    assert_eq!(quiz.phase(), QuizPhase::Finished);
    let report = quiz.report().unwrap();
    assert_eq!((report.score, report.total, report.percentage), (6, 6, 100));
    assert_eq!(report.feedback, Feedback::Excellent);

    quiz.reset();
    assert_eq!(quiz.phase(), QuizPhase::Answering);
    assert_eq!(quiz.answer("1"), None::<&Answer>);
}
