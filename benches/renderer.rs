use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hourglass_renderer::chart::render_hourglass;
use hourglass_renderer::config::Config;
use hourglass_renderer::data::{Family, GenealogyData, Individual, JsonDataProvider};
use hourglass_renderer::tree::StartPoint;
use std::hint::black_box;
use std::rc::Rc;

fn person(id: String, famc: Option<String>, fams: Vec<String>) -> Individual {
    Individual {
        first_name: Some(format!("Name{id}")),
        last_name: Some("Family".to_string()),
        famc,
        fams,
        id,
        ..Default::default()
    }
}

/// A full binary pedigree of `generations` above `P0` and a fan of
/// `children` per couple for `generations` below it.
fn synthetic_tree(generations: usize, children: usize) -> JsonDataProvider {
    let mut data = GenealogyData::default();

    let famc = |id: &str, last: bool| (!last).then(|| format!("A{id}"));
    data.indis.push(person("P0".into(), famc("P0", generations == 0), vec!["D0".into()]));
    let mut frontier = vec!["P0".to_string()];
    let mut next_id = 1usize;
    for generation in 0..generations {
        let last = generation + 1 == generations;
        let mut next = Vec::new();
        for child in &frontier {
            let husb = format!("P{next_id}");
            let wife = format!("P{}", next_id + 1);
            next_id += 2;
            let fam = format!("A{child}");
            for id in [&husb, &wife] {
                data.indis.push(person(id.clone(), famc(id, last), vec![fam.clone()]));
            }
            data.fams.push(Family {
                id: fam,
                husb: Some(husb.clone()),
                wife: Some(wife.clone()),
                children: vec![child.clone()],
            });
            next.push(husb);
            next.push(wife);
        }
        frontier = next;
    }

    let mut parents = vec![("P0".to_string(), "D0".to_string())];
    for generation in 0..generations {
        let mut next = Vec::new();
        for (parent, fam) in parents {
            let mut kids = Vec::new();
            for k in 0..children {
                let id = format!("C{generation}_{parent}_{k}");
                let own = format!("D{generation}_{parent}_{k}");
                let fams = if generation + 1 < generations {
                    vec![own.clone()]
                } else {
                    Vec::new()
                };
                data.indis.push(person(id.clone(), Some(fam.clone()), fams));
                next.push((id.clone(), own));
                kids.push(id);
            }
            data.fams.push(Family {
                id: fam,
                husb: Some(parent),
                wife: None,
                children: kids,
            });
        }
        parents = next;
    }
    JsonDataProvider::new(data)
}

fn bench_render(c: &mut Criterion) {
    let mut config = Config::default();
    config.layout.fast_text_metrics = true;
    let mut group = c.benchmark_group("hourglass");
    for generations in [2usize, 4, 6] {
        config.layout.max_ancestor_generations = generations;
        config.layout.max_descendant_generations = generations;
        let data = Rc::new(synthetic_tree(generations, 3));
        group.bench_with_input(
            BenchmarkId::new("render", generations),
            &generations,
            |b, _| {
                b.iter(|| {
                    let rendered = render_hourglass(
                        data.clone(),
                        StartPoint::Indi("P0".into()),
                        black_box(&config),
                    )
                    .expect("render failed");
                    black_box(rendered.svg.len())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
