use analytics::AnalyticsEngine;
use core_types::{NewStudent, Scores, Tier};
use database::{connect_url, DeleteOutcome, StudentRepository};

async fn repository() -> StudentRepository {
    StudentRepository::new(connect_url("sqlite::memory:").await.unwrap())
}

fn student(name: &str, section: &str, m: f64, s: f64, e: f64) -> NewStudent {
    NewStudent::new(name, section, Scores::new(m, s, e).unwrap()).unwrap()
}

#[tokio::test]
async fn add_search_delete_scenario() {
    let mut repo = repository().await;

    let ana = repo.create(student("Ana", "A", 95.0, 92.0, 91.0)).await.unwrap();
    assert!((ana.average - 92.666_666_666_666_67).abs() < 1e-9);
    assert_eq!(ana.remarks, Tier::Excellent);

    let bo = repo.create(student("Bo", "B", 70.0, 60.0, 65.0)).await.unwrap();
    assert_eq!(bo.average, 65.0);
    assert_eq!(bo.remarks, Tier::NeedsImprovement);

    let in_a = repo.find_by_section("a").await.unwrap();
    assert_eq!(in_a.len(), 1);
    assert_eq!(in_a[0].name, "Ana");

    assert_eq!(repo.delete("Ana", false).await.unwrap(), DeleteOutcome::Cancelled);
    assert!(repo.find_exact_by_name("Ana").await.unwrap().is_some());

    assert_eq!(
        repo.delete("Ana", true).await.unwrap(),
        DeleteOutcome::Deleted(ana)
    );
    assert!(repo.find_exact_by_name("Ana").await.unwrap().is_none());

    repo.close().await.unwrap();
}

#[tokio::test]
async fn created_record_round_trips_through_exact_lookup() {
    let mut repo = repository().await;
    let scores = Scores::new(88.5, 79.25, 90.0).unwrap();
    let created = repo
        .create(NewStudent::new("Mary Ann", "", scores).unwrap())
        .await
        .unwrap();

    let found = repo.find_exact_by_name("mary ann").await.unwrap().unwrap();

    assert_eq!(found, created);
    assert_eq!(found.section, "N/A");
    assert!((found.average - scores.average()).abs() < 1e-9);
    assert_eq!(found.remarks, scores.remarks());
}

#[tokio::test]
async fn analytics_reflect_the_current_table() {
    let mut repo = repository().await;
    let engine = AnalyticsEngine::new();

    assert!(engine.calculate(&repo.grade_columns().await.unwrap()).is_empty());

    repo.create(student("Ana", "A", 95.0, 92.0, 91.0)).await.unwrap();
    repo.create(student("Bo", "B", 70.0, 60.0, 65.0)).await.unwrap();
    repo.create(student("Cy", "B", 80.0, 75.0, 85.0)).await.unwrap();

    let report = engine.calculate(&repo.grade_columns().await.unwrap());
    assert_eq!(report.math.highest, 95.0);
    assert_eq!(report.science.lowest, 60.0);
    assert_eq!(report.overall.count, 3);
    assert_eq!(report.distribution.excellent, 1);
    assert_eq!(report.distribution.good, 1);
    assert_eq!(report.distribution.needs_improvement, 1);

    repo.delete("Bo", true).await.unwrap();
    let report = engine.calculate(&repo.grade_columns().await.unwrap());
    assert_eq!(report.overall.count, 2);
    assert_eq!(report.distribution.needs_improvement, 0);
}
