//! Integration tests for the four built-in pages against saved snapshots.

use std::path::{Path, PathBuf};

use dokianime::{
    AnimeInfo, EpisodeSummary, Extractor, Page, PageData, ScrapeError, SchemaRegistry, Scraper,
    SearchResultEntry, StreamInfo, DEFAULT_EPISODE_TYPE, DEFAULT_ORIGIN, NO_TITLE,
};

// ─────────────────────── helpers ───────────────────────

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn scraper_for(dir: &Path) -> Scraper {
    Scraper::new(SchemaRegistry::builtin().unwrap(), Extractor::default(), dir)
}

fn fixture_scraper() -> Scraper {
    scraper_for(&fixtures_dir())
}

fn scrape_latest() -> Vec<EpisodeSummary> {
    match fixture_scraper().scrape(Page::Latest).unwrap() {
        PageData::Latest(items) => items,
        other => panic!("expected latest data, got {other:?}"),
    }
}

fn scrape_search() -> Vec<SearchResultEntry> {
    match fixture_scraper().scrape(Page::Search).unwrap() {
        PageData::Search(items) => items,
        other => panic!("expected search data, got {other:?}"),
    }
}

fn scrape_info() -> AnimeInfo {
    match fixture_scraper().scrape(Page::Info).unwrap() {
        PageData::Info(info) => info,
        other => panic!("expected info data, got {other:?}"),
    }
}

fn scrape_stream() -> StreamInfo {
    match fixture_scraper().scrape(Page::Stream).unwrap() {
        PageData::Stream(stream) => stream,
        other => panic!("expected stream data, got {other:?}"),
    }
}

// ─────────────────────── latest ───────────────────────

#[test]
fn test_latest_counts_only_latest_tab_cards() {
    let episodes = scrape_latest();
    assert_eq!(episodes.len(), 2);
}

#[test]
fn test_latest_fields() {
    let episodes = scrape_latest();
    let first = &episodes[0];
    assert_eq!(first.anime_title, "Frieren: Beyond Journey's End");
    assert!(first.image_url.starts_with("https://anify.to"));
    assert_eq!(first.image_url, "https://anify.to/images/posters/frieren.jpg");
    assert_eq!(
        first.watch_link,
        "https://anify.to/watch/frieren-beyond-journeys-end-episode-12"
    );
    assert_eq!(
        first.anime_details_link,
        "https://anify.to/anime/frieren-beyond-journeys-end"
    );
    assert_eq!(first.episode_text, "EP 12");
    assert_eq!(first.episode_title, "A Real Hero");
}

#[test]
fn test_latest_missing_title_uses_placeholder() {
    let episodes = scrape_latest();
    assert_eq!(episodes[1].episode_title, NO_TITLE);
    assert_eq!(episodes[1].episode_title, "No title available");
    assert_eq!(episodes[1].episode_text, "EP 8");
}

#[test]
fn test_latest_json_uses_camel_case_keys() {
    let data = fixture_scraper().scrape(Page::Latest).unwrap();
    let json = serde_json::to_value(&data).unwrap();
    let first = &json[0];
    for key in [
        "animeTitle",
        "imageUrl",
        "watchLink",
        "animeDetailsLink",
        "episodeText",
        "episodeTitle",
    ] {
        assert!(first.get(key).is_some(), "missing key {key}");
    }
}

// ─────────────────────── search ───────────────────────

#[test]
fn test_search_results() {
    let results = scrape_search();
    assert_eq!(results.len(), 3);

    let first = &results[0];
    assert_eq!(first.title, "Frieren: Beyond Journey's End");
    assert_eq!(
        first.details_link,
        "https://anify.to/anime/frieren-beyond-journeys-end"
    );
    assert_eq!(first.score, "9.1");
    assert_eq!(first.year, "2023");
    assert_eq!(first.genres, vec!["Adventure", "Drama", "Fantasy"]);
    assert_eq!(results[1].genres, vec!["Drama", "Mystery"]);
}

#[test]
fn test_search_missing_poster_is_empty_and_genres_empty() {
    let results = scrape_search();
    let last = &results[2];
    assert_eq!(last.image_url, "");
    assert!(last.genres.is_empty());
}

// ─────────────────────── info ───────────────────────

#[test]
fn test_anime_info() {
    let info = scrape_info();
    assert_eq!(info.title, "Frieren: Beyond Journey's End");
    assert_eq!(
        info.poster_image,
        "https://anify.to/images/posters/frieren-large.jpg"
    );
    assert!(info.description.starts_with("The adventure is over"));
    assert_eq!(info.score, "9.1");
    assert_eq!(info.rating, "PG-13");
    assert_eq!(info.year, "2023");
    assert_eq!(info.status, "Finished Airing");
    assert_eq!(info.genres, vec!["Adventure", "Drama", "Fantasy"]);
}

#[test]
fn test_anime_info_episodes() {
    let info = scrape_info();
    assert_eq!(info.episodes.len(), 3);
    assert_eq!(info.episodes[0].title, "The Journey's End");
    assert_eq!(
        info.episodes[0].watch_link,
        "https://anify.to/watch/frieren-beyond-journeys-end-episode-1"
    );
    assert_eq!(
        info.episodes[0].thumbnail,
        "https://anify.to/images/thumbs/frieren-1.jpg"
    );
    assert_eq!(info.episodes[0].episode_type, DEFAULT_EPISODE_TYPE);
    assert_eq!(info.episodes[2].episode_type, "Special");

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["episodes"][0]["type"], "Episode");
}

// ─────────────────────── stream ───────────────────────

#[test]
fn test_stream_info() {
    let stream = scrape_stream();
    assert_eq!(stream.anime_title, "Frieren: Beyond Journey's End");
    assert_eq!(stream.episode_number, "Episode 12");
    assert_eq!(stream.episode_title, "A Real Hero");
}

#[test]
fn test_stream_sources_without_path_are_omitted() {
    let stream = scrape_stream();
    assert_eq!(stream.stream_sources.len(), 2);
    assert_eq!(stream.stream_sources[0].server, "Vidstream");
    assert_eq!(
        stream.stream_sources[0].url,
        "https://anify.to/embed/vidstream/frieren-12"
    );
    assert_eq!(stream.stream_sources[1].server, "MyCloud");
    assert!(stream.stream_sources.iter().all(|s| !s.url.is_empty()));
}

#[test]
fn test_stream_episode_list_filler_flag() {
    let stream = scrape_stream();
    let episodes: Vec<_> = stream.episode_list.iter().map(|e| e.episode.as_str()).collect();
    assert_eq!(episodes, vec!["10", "11", "12", "13"]);

    let fillers: Vec<_> = stream.episode_list.iter().map(|e| e.filler).collect();
    assert_eq!(fillers, vec![false, true, false, false]);
    assert_eq!(
        stream.episode_list[1].link,
        "https://anify.to/watch/frieren-beyond-journeys-end-episode-11"
    );
}

// ─────────────────────── origin & failures ───────────────────────

#[test]
fn test_urls_are_origin_plus_relative_path() {
    let html = std::fs::read_to_string(fixtures_dir().join("homepage.html")).unwrap();
    let changed = html.replace("/images/posters/frieren.jpg", "/cdn/other.webp");
    let scraper = fixture_scraper();

    let original = scraper.parse(Page::Latest, &html).unwrap();
    let modified = scraper.parse(Page::Latest, &changed).unwrap();
    let (PageData::Latest(original), PageData::Latest(modified)) = (original, modified) else {
        panic!("expected latest data");
    };
    assert_eq!(original[0].image_url, format!("{DEFAULT_ORIGIN}/images/posters/frieren.jpg"));
    assert_eq!(modified[0].image_url, format!("{DEFAULT_ORIGIN}/cdn/other.webp"));
    assert_eq!(original[1], modified[1]);
}

#[test]
fn test_missing_document_for_every_page() {
    let dir = tempfile::tempdir().unwrap();
    let scraper = scraper_for(dir.path());
    for page in Page::ALL {
        assert!(matches!(
            scraper.scrape(page),
            Err(ScrapeError::Document { .. })
        ));
    }
}

#[test]
fn test_empty_document_yields_empty_records() {
    let scraper = fixture_scraper();
    assert_eq!(
        scraper.parse(Page::Latest, "<html></html>").unwrap(),
        PageData::Latest(Vec::new())
    );

    let PageData::Stream(stream) = scraper.parse(Page::Stream, "").unwrap() else {
        panic!("expected stream data");
    };
    assert_eq!(stream.anime_title, "");
    assert!(stream.stream_sources.is_empty());
    assert!(stream.episode_list.is_empty());
}

#[test]
fn test_scraper_shared_across_threads() {
    let scraper = std::sync::Arc::new(fixture_scraper());
    let handles: Vec<_> = Page::ALL
        .into_iter()
        .map(|page| {
            let scraper = std::sync::Arc::clone(&scraper);
            std::thread::spawn(move || scraper.scrape(page).map(|data| data.record_count()))
        })
        .collect();
    let counts: Vec<usize> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert_eq!(counts, vec![2, 3, 1, 1]);
}

#[test]
fn test_record_counts() {
    let scraper = fixture_scraper();
    assert_eq!(scraper.scrape(Page::Latest).unwrap().record_count(), 2);
    assert_eq!(scraper.scrape(Page::Search).unwrap().record_count(), 3);
    assert_eq!(scraper.scrape(Page::Info).unwrap().record_count(), 1);
    assert_eq!(scraper.scrape(Page::Stream).unwrap().record_count(), 1);
}
