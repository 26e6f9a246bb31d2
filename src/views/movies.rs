use maud::{Markup, html};

use crate::cinema::{ScheduleSnapshot, ScheduleStatus, search_movies};

fn status_banner(snapshot: &ScheduleSnapshot) -> Markup {
    let updated = snapshot
        .fetched_at
        .map(|at| at.format("%H:%M UTC").to_string());

    html! {
        @match snapshot.status {
            ScheduleStatus::Live => {
                div.banner.banner-live role="status" { "Live showtimes" }
            }
            ScheduleStatus::Cached => {
                div.banner.banner-cached role="status" {
                    "Showtimes last updated"
                    @if let Some(updated) = &updated {
                        " at " (updated)
                    }
                    "."
                }
            }
            ScheduleStatus::Fallback => {
                div.banner.banner-demo role="status" {
                    strong { "Demo Mode" }
                    " Live showtimes are unavailable right now, so these are sample listings."
                }
            }
        }
    }
}

pub fn movies_page(snapshot: &ScheduleSnapshot, cinema_ids: &[String], query: &str) -> Markup {
    let cinema = &snapshot.schedule.cinema;
    let movies = search_movies(&snapshot.schedule.movies, query);

    html! {
        h1 { "Movies at " (cinema.name) }
        (status_banner(snapshot))

        form.movie-search method="get" action="/movies" role="search" {
            @if cinema_ids.len() > 1 {
                select name="cinema" {
                    @for id in cinema_ids {
                        option value=(id) selected[*id == cinema.id] { (id) }
                    }
                }
            } @else {
                input type="hidden" name="cinema" value=(cinema.id);
            }
            input type="search" name="q" value=(query) placeholder="Search movies";
            button type="submit" { "Search" }
        }

        @if movies.is_empty() {
            p.empty-state {
                @if query.trim().is_empty() {
                    "No movies are scheduled today."
                } @else {
                    "No movies match \u{201c}" (query.trim()) "\u{201d}."
                }
            }
        }

        div.movie-grid {
            @for movie in &movies {
                article.card.movie {
                    @if let Some(poster) = &movie.poster_url {
                        img src=(poster) alt={ (movie.title) " poster" } loading="lazy";
                    }
                    h2 { (movie.title) }
                    p.meta {
                        @if let Some(rating) = &movie.rating {
                            span.badge { (rating) } " "
                        }
                        @if let Some(minutes) = movie.duration_minutes {
                            (minutes / 60) "h " (minutes % 60) "m"
                        }
                    }
                    ul.showtimes {
                        @for time in &movie.showtimes {
                            li { (time) }
                        }
                    }
                }
            }
        }

        aside.cinema-info {
            h2 { (cinema.name) }
            @if let Some(address) = &cinema.address {
                p { (address) }
            }
            @if let Some(phone) = &cinema.phone {
                p { a href={ "tel:" (phone) } { (phone) } }
            }
            @if !cinema.pricing.is_empty() {
                table.pricing {
                    @for tier in &cinema.pricing {
                        tr {
                            th { (tier.label) }
                            td { (format!("${:.2}", tier.price)) }
                        }
                    }
                }
            }
        }
    }
}
